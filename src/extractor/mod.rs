//! PDF 텍스트 추출 모듈
//!
//! pdf-extract 크레이트를 사용하여 PDF 바이트에서 텍스트를 추출합니다.
//! 페이지 순서대로 이어붙인 하나의 평탄한 문자열을 반환합니다.

use crate::error::{RagError, Result};

/// PDF 바이트에서 텍스트 추출
///
/// 모든 페이지의 텍스트를 페이지 순서대로, 구분자 없이 이어붙여 반환합니다.
/// 입력 바이트의 순수 함수이며 파일시스템에 접근하지 않습니다.
///
/// # Errors
/// PDF 구조가 유효하지 않으면 `RagError::Extraction`을 반환합니다.
/// 스캔 문서처럼 텍스트가 없는 페이지는 에러가 아니라 빈 문자열입니다.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| RagError::Extraction(format!("invalid PDF structure: {e}")))?;

    if text.trim().is_empty() {
        tracing::warn!("No text extracted from PDF. It might be a scanned document.");
    }

    Ok(text)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::minimal_pdf;

    #[test]
    fn test_extract_invalid_bytes() {
        let result = extract_pdf_text(b"this is not a pdf");
        assert!(matches!(result, Err(RagError::Extraction(_))));
    }

    #[test]
    fn test_extract_empty_bytes() {
        let result = extract_pdf_text(b"");
        assert!(matches!(result, Err(RagError::Extraction(_))));
    }

    #[test]
    fn test_extract_minimal_pdf() {
        let bytes = minimal_pdf("Bananas are yellow.");
        let text = extract_pdf_text(&bytes).expect("valid PDF should extract");
        assert!(text.contains("Bananas are yellow."));
    }
}
