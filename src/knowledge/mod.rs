//! Knowledge 모듈 - 청킹 + 벡터 인덱스 + 영속화
//!
//! - Chunker: 구분자 경계 인식 슬라이딩 윈도우 분할
//! - VectorIndex: 인메모리 코사인 유사도 top-k 검색
//! - IndexStore: JSON 아티팩트 저장/로드 (통째 덮어쓰기)

mod chunker;
mod store;
mod vector;

// Re-exports
pub use chunker::{default_chunker, sliding_chunker, ChunkConfig, Chunker, SlidingChunker};
pub use store::{
    default_index_path, get_data_dir, IndexMetadata, IndexStore, DEFAULT_INDEX_NAME,
};
pub use vector::{cosine_similarity, SearchResult, VectorEntry, VectorIndex};
