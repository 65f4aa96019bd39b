//! 프롬프트 템플릿 및 그라운딩 계약
//!
//! 검색된 컨텍스트와 질문을 하나의 프롬프트로 합칩니다 ("stuff" 방식).
//! 컨텍스트에 답이 없으면 생성기는 센티널 문구를 정확히 반환해야 합니다.

use crate::knowledge::SearchResult;

/// 컨텍스트에 답이 없을 때 생성기가 반환해야 하는 센티널 문구
pub const NO_ANSWER_SENTINEL: &str = "answer is not in the context";

/// 검색 결과를 컨텍스트 문자열로 합치기
///
/// 검색 순서(유사도 내림차순)를 유지하며 빈 줄로 구분합니다.
pub fn build_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.chunk_text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// 프롬프트 조립 (순수 함수)
///
/// 그라운딩 지시가 상수 템플릿으로 포함됩니다:
/// 주어진 컨텍스트만 사용해 답하고, 답이 없으면 센티널을 그대로 반환합니다.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer the question as detailed as possible from the provided context, \
         make sure to provide all the details. \
         If the answer is not in the provided context just say, \"{NO_ANSWER_SENTINEL}\", \
         don't provide the wrong answer.\n\n\
         Context:\n{context}\n\n\
         Question:\n{question}\n\n\
         Answer:"
    )
}

// ============================================================================
// Answer
// ============================================================================

/// 생성 결과
///
/// 센티널 문자열 비교 대신 태그된 결과로 표현하고,
/// 외부 경계에서만 센티널 문자열로 직렬화합니다.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// 컨텍스트에 근거한 답변
    Grounded(String),
    /// 컨텍스트에 답이 없음
    Ungrounded,
}

impl Answer {
    /// 생성기의 원시 출력을 분류
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim().trim_matches('"');
        if trimmed.eq_ignore_ascii_case(NO_ANSWER_SENTINEL) {
            Answer::Ungrounded
        } else {
            Answer::Grounded(raw.trim().to_string())
        }
    }

    /// 외부 경계용 텍스트 (Ungrounded는 센티널 문구)
    pub fn into_text(self) -> String {
        match self {
            Answer::Grounded(text) => text,
            Answer::Ungrounded => NO_ANSWER_SENTINEL.to_string(),
        }
    }

    /// 근거 있는 답변인지 여부
    pub fn is_grounded(&self) -> bool {
        matches!(self, Answer::Grounded(_))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn result(text: &str, similarity: f32) -> SearchResult {
        SearchResult {
            chunk_text: text.to_string(),
            similarity,
        }
    }

    #[test]
    fn test_build_context_preserves_order() {
        let results = vec![result("most similar", 0.9), result("less similar", 0.5)];
        let context = build_context(&results);
        let first = context.find("most similar").unwrap();
        let second = context.find("less similar").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_build_context_empty() {
        assert_eq!(build_context(&[]), "");
    }

    #[test]
    fn test_build_prompt_contains_fields() {
        let prompt = build_prompt("Bananas are yellow.", "What color are bananas?");
        assert!(prompt.contains("Bananas are yellow."));
        assert!(prompt.contains("What color are bananas?"));
        assert!(prompt.contains(NO_ANSWER_SENTINEL));
    }

    #[test]
    fn test_build_prompt_deterministic() {
        let a = build_prompt("ctx", "q");
        let b = build_prompt("ctx", "q");
        assert_eq!(a, b);
    }

    #[test]
    fn test_answer_sentinel_classification() {
        assert_eq!(Answer::from_raw("answer is not in the context"), Answer::Ungrounded);
        assert_eq!(
            Answer::from_raw("  answer is not in the context \n"),
            Answer::Ungrounded
        );
        assert_eq!(
            Answer::from_raw("\"answer is not in the context\""),
            Answer::Ungrounded
        );
    }

    #[test]
    fn test_answer_grounded() {
        let answer = Answer::from_raw("Bananas are yellow.");
        assert!(answer.is_grounded());
        assert_eq!(answer.into_text(), "Bananas are yellow.");
    }

    #[test]
    fn test_ungrounded_serializes_to_sentinel() {
        assert_eq!(Answer::Ungrounded.into_text(), NO_ANSWER_SENTINEL);
    }
}
