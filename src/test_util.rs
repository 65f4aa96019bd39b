//! 테스트 유틸리티 - 결정적 목 프로바이더와 최소 PDF 생성기

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::generation::prompt::NO_ANSWER_SENTINEL;
use crate::generation::AnswerGenerator;

// ============================================================================
// MockEmbedding
// ============================================================================

/// 결정적 목 임베딩
///
/// 단어를 FNV-1a 해시로 버킷에 누적한 뒤 정규화합니다.
/// 단어를 공유하는 텍스트일수록 코사인 유사도가 높아집니다.
pub struct MockEmbedding {
    dimension: usize,
}

impl MockEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn model_name(&self) -> &'static str {
        "mock-embedding"
    }

    /// 동기 임베딩 (테스트에서 질의 벡터를 직접 만들 때 사용)
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for word in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
            for byte in word.bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(0x100_0000_01b3);
            }
            vector[(hash % self.dimension as u64) as usize] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }

        vector
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        self.model_name()
    }
}

// ============================================================================
// KeywordMockGenerator
// ============================================================================

/// 그라운딩 계약을 흉내내는 목 생성기
///
/// 질문의 단어(4자 이상)가 컨텍스트에 있으면 해당 문장을 답으로 반환하고,
/// 없으면 센티널 문구를 반환합니다.
pub struct KeywordMockGenerator;

#[async_trait]
impl AnswerGenerator for KeywordMockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let context = section(prompt, "Context:\n", "\n\nQuestion:");
        let question = section(prompt, "Question:\n", "\n\nAnswer:");

        let context_lower = context.to_lowercase();

        for word in question
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() >= 4)
        {
            if context_lower.contains(word) {
                // 키워드가 포함된 문장을 답으로 반환
                let sentence = context
                    .split('.')
                    .find(|s| s.to_lowercase().contains(word))
                    .unwrap_or(context)
                    .trim();
                return Ok(format!("{sentence}."));
            }
        }

        Ok(NO_ANSWER_SENTINEL.to_string())
    }

    fn name(&self) -> &str {
        "keyword-mock"
    }
}

/// 프롬프트에서 구간 추출
fn section<'a>(prompt: &'a str, start: &str, end: &str) -> &'a str {
    let from = prompt.find(start).map(|p| p + start.len()).unwrap_or(0);
    let to = prompt[from..]
        .find(end)
        .map(|p| from + p)
        .unwrap_or(prompt.len());
    &prompt[from..to]
}

// ============================================================================
// Minimal PDF Builder
// ============================================================================

/// 단일 페이지 텍스트 PDF 생성 (바이트 정확한 xref 포함)
///
/// 텍스트에 괄호나 백슬래시가 없어야 합니다 (PDF 문자열 이스케이프 미지원).
pub fn minimal_pdf(text: &str) -> Vec<u8> {
    assert!(
        !text.contains(['(', ')', '\\']),
        "minimal_pdf does not escape PDF string delimiters"
    );

    let stream = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());

    for (i, obj) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, obj));
    }

    let xref_pos = out.len();
    out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    out.push_str("0000000000 65535 f \n");
    for offset in &offsets {
        out.push_str(&format!("{offset:010} 00000 n \n"));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_pos
    ));

    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_embedding_deterministic() {
        let embedder = MockEmbedding::new(16);
        assert_eq!(embedder.embed_sync("hello world"), embedder.embed_sync("hello world"));
    }

    #[test]
    fn test_mock_embedding_similarity() {
        let embedder = MockEmbedding::new(32);
        let a = embedder.embed_sync("bananas are yellow");
        let b = embedder.embed_sync("what color are bananas");
        let c = embedder.embed_sync("stock market report");

        let sim_related = crate::knowledge::cosine_similarity(&a, &b);
        let sim_unrelated = crate::knowledge::cosine_similarity(&a, &c);
        assert!(sim_related > sim_unrelated);
    }

    #[test]
    fn test_minimal_pdf_has_header_and_trailer() {
        let bytes = minimal_pdf("hello");
        let s = String::from_utf8(bytes).unwrap();
        assert!(s.starts_with("%PDF-1.4"));
        assert!(s.ends_with("%%EOF\n"));
        assert!(s.contains("startxref"));
    }
}
