//! 에러 타입 정의
//!
//! 파이프라인 전역에서 사용하는 에러 분류입니다.
//! 모든 에러는 즉시 호출자에게 전파되며 내부 복구 로직은 없습니다.

use std::path::PathBuf;

use thiserror::Error;

/// RAG 파이프라인 에러
#[derive(Debug, Error)]
pub enum RagError {
    /// PDF 구조가 손상되었거나 추출에 실패한 경우
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    /// 인덱싱할 청크가 하나도 없는 경우
    #[error("no chunks to index (empty corpus)")]
    EmptyCorpus,

    /// 영속화된 인덱스가 존재하지 않는 경우 (인제스트 전 질의)
    #[error("no persisted index found at {0} (run ingest first)")]
    IndexNotFound(PathBuf),

    /// 인덱스 아티팩트를 읽을 수 없거나 차원이 일치하지 않는 경우
    #[error("persisted index is unusable: {0}")]
    IndexCorrupt(String),

    /// 임베딩/생성 프로바이더 호출 실패 (네트워크, 쿼터, 인증)
    #[error("provider call failed: {0}")]
    Provider(String),

    /// 파일시스템 에러
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// 파이프라인 공용 Result
pub type Result<T> = std::result::Result<T, RagError>;
