//! pdfchat-rag - PDF 질의응답 RAG 시스템
//!
//! PDF 문서를 추출/청킹/임베딩하여 로컬 벡터 인덱스를 만들고,
//! 질문에 대해 top-k 유사 청크를 검색한 뒤 Gemini로 답변을 생성합니다.
//! 답변은 검색된 컨텍스트에만 근거합니다 (그라운딩).

pub mod cli;
pub mod embedding;
pub mod error;
pub mod extractor;
pub mod generation;
pub mod knowledge;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_util;

// Re-exports
pub use embedding::{get_api_key, has_api_key, EmbeddingProvider, GeminiEmbedding};
pub use error::RagError;
pub use extractor::extract_pdf_text;
pub use generation::prompt::{build_context, build_prompt, Answer, NO_ANSWER_SENTINEL};
pub use generation::{AnswerGenerator, GeminiGenerator};
pub use knowledge::{
    cosine_similarity, default_chunker, default_index_path, get_data_dir, sliding_chunker,
    ChunkConfig, Chunker, IndexMetadata, IndexStore, SearchResult, SlidingChunker, VectorEntry,
    VectorIndex,
};
pub use pipeline::{IngestReport, RagConfig, RagPipeline};
