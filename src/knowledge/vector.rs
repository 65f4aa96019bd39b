//! Vector Index - 인메모리 벡터 인덱스 및 유사도 검색
//!
//! (청크 텍스트, 임베딩 벡터) 쌍을 보관하고
//! 코사인 유사도 기반 완전 탐색 top-k 검색을 제공합니다.

use serde::{Deserialize, Serialize};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

// ============================================================================
// Types
// ============================================================================

/// 벡터 엔트리 (청크 텍스트 + 임베딩)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorEntry {
    /// 청크 텍스트
    pub chunk_text: String,
    /// 임베딩 벡터
    pub embedding: Vec<f32>,
}

/// 검색 결과
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// 청크 텍스트
    pub chunk_text: String,
    /// 코사인 유사도 (-1.0 ~ 1.0)
    pub similarity: f32,
}

// ============================================================================
// VectorIndex
// ============================================================================

/// 인메모리 벡터 인덱스
///
/// 인제스트마다 새로 만들어지며 기존 인덱스와 병합하지 않습니다.
/// 질의는 읽기 전용입니다.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    entries: Vec<VectorEntry>,
    dimension: usize,
}

impl VectorIndex {
    /// 청크 목록을 임베딩하여 인덱스 생성
    ///
    /// # Errors
    /// 청크가 비어있으면 프로바이더 호출 전에 `RagError::EmptyCorpus`를 반환합니다.
    pub async fn build(chunks: &[String], embedder: &dyn EmbeddingProvider) -> Result<Self> {
        if chunks.is_empty() {
            return Err(RagError::EmptyCorpus);
        }

        let mut entries = Vec::with_capacity(chunks.len());

        for (i, chunk) in chunks.iter().enumerate() {
            tracing::debug!("Embedding chunk {}/{}", i + 1, chunks.len());
            let embedding = embedder.embed(chunk).await?;
            entries.push(VectorEntry {
                chunk_text: chunk.clone(),
                embedding,
            });
        }

        Ok(Self {
            entries,
            dimension: embedder.dimension(),
        })
    }

    /// 저장된 엔트리로 인덱스 재구성 (로드 경로)
    pub fn from_entries(entries: Vec<VectorEntry>, dimension: usize) -> Self {
        Self { entries, dimension }
    }

    /// 질의 벡터와 가장 유사한 top-k 청크 검색
    ///
    /// 유사도 내림차순으로 `min(k, len)` 개를 반환합니다.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Vec<SearchResult> {
        let mut scored: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| SearchResult {
                chunk_text: entry.chunk_text.clone(),
                similarity: cosine_similarity(query_embedding, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        scored.truncate(k);
        scored
    }

    /// 엔트리 개수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 비어있는지 여부
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 임베딩 차원
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// 내부 엔트리 참조 (영속화용)
    pub fn entries(&self) -> &[VectorEntry] {
        &self.entries
    }
}

// ============================================================================
// Utility Functions
// ============================================================================

/// 코사인 유사도 계산
///
/// 두 벡터 간의 코사인 유사도를 계산합니다.
/// 길이가 다르거나 영벡터면 0.0을 반환합니다.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

// ============================================================================
// Tests
// ============================================================================
