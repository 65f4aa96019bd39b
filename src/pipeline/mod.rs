//! Pipeline 모듈 - 인제스트/질의 오케스트레이터
//!
//! 두 개의 독립 플로우를 연결합니다:
//! - 인제스트: PDF 바이트 → 텍스트 → 청크 → 임베딩 → 인덱스 영속화
//! - 질의: 질문 → 인덱스 로드 → top-k 검색 → 프롬프트 → 답변 생성
//!
//! 영속화된 인덱스 외에 공유 가변 상태는 없습니다. 각 호출은 완료까지
//! 동기적으로 실행됩니다. 동시 인제스트 쓰기는 최대 1개가 호출자 책임입니다.

use std::path::PathBuf;
use std::sync::Arc;

use crate::embedding::{EmbeddingProvider, GeminiEmbedding};
use crate::error::{RagError, Result};
use crate::extractor::extract_pdf_text;
use crate::generation::prompt::{build_context, build_prompt, Answer};
use crate::generation::{AnswerGenerator, GeminiGenerator};
use crate::knowledge::{default_index_path, sliding_chunker, ChunkConfig, Chunker, IndexStore, VectorIndex};

// ============================================================================
// Configuration
// ============================================================================

/// 파이프라인 설정
#[derive(Debug, Clone)]
pub struct RagConfig {
    /// 청킹 설정
    pub chunk: ChunkConfig,
    /// 검색 결과 개수 (top-k)
    pub retrieval_k: usize,
    /// 생성 온도
    pub temperature: f32,
    /// 인덱스 아티팩트 경로
    pub index_path: PathBuf,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk: ChunkConfig::default(),
            retrieval_k: 4,
            temperature: crate::generation::DEFAULT_TEMPERATURE,
            index_path: default_index_path(),
        }
    }
}

/// 인제스트 결과 리포트
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// 처리된 문서 수
    pub document_count: usize,
    /// 인덱싱된 청크 수
    pub chunk_count: usize,
    /// 인덱스 경로
    pub index_path: PathBuf,
}

// ============================================================================
// RagPipeline
// ============================================================================

/// RAG 파이프라인
///
/// 프로바이더는 생성 시점에 명시적으로 주입됩니다 (전역 싱글톤 없음).
pub struct RagPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn AnswerGenerator>,
    chunker: Box<dyn Chunker>,
    store: IndexStore,
    retrieval_k: usize,
}

impl RagPipeline {
    /// 환경변수의 API 키로 Gemini 프로바이더를 구성하여 생성
    pub fn from_env(config: RagConfig) -> Result<Self> {
        let embedder = Arc::new(GeminiEmbedding::from_env()?);
        let generator = Arc::new(GeminiGenerator::with_temperature(
            crate::embedding::get_api_key()?,
            config.temperature,
        )?);
        Ok(Self::with_providers(config, embedder, generator))
    }

    /// 프로바이더를 직접 주입하여 생성
    pub fn with_providers(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn AnswerGenerator>,
    ) -> Self {
        Self {
            embedder,
            generator,
            chunker: sliding_chunker(config.chunk),
            store: IndexStore::new(config.index_path),
            retrieval_k: config.retrieval_k,
        }
    }

    /// 인덱스 아티팩트 경로
    pub fn index_path(&self) -> &std::path::Path {
        self.store.path()
    }

    // ------------------------------------------------------------------------
    // Ingestion Flow
    // ------------------------------------------------------------------------

    /// PDF 배치 인제스트
    ///
    /// 배치 전체의 청크를 모아 한 번의 빌드+영속화를 수행합니다.
    /// 어느 한 문서라도 추출에 실패하면 배치 전체가 중단되며
    /// 아무것도 영속화되지 않습니다 (all-or-nothing).
    pub async fn ingest(&self, documents: &[Vec<u8>]) -> Result<IngestReport> {
        let mut texts = Vec::with_capacity(documents.len());

        for (i, bytes) in documents.iter().enumerate() {
            tracing::info!("Extracting document {}/{}", i + 1, documents.len());

            // PDF 추출은 CPU 바운드이므로 spawn_blocking 사용
            let owned = bytes.clone();
            let text = tokio::task::spawn_blocking(move || extract_pdf_text(&owned))
                .await
                .map_err(|e| RagError::Extraction(format!("extraction task failed: {e}")))??;

            texts.push(text);
        }

        self.ingest_extracted(&texts).await
    }

    /// 추출된 텍스트들을 청킹하고 단일 인덱스로 영속화
    async fn ingest_extracted(&self, texts: &[String]) -> Result<IngestReport> {
        let mut chunks = Vec::new();
        for text in texts {
            chunks.extend(self.chunker.chunk(text));
        }

        if chunks.is_empty() {
            return Err(RagError::EmptyCorpus);
        }

        tracing::info!(
            "Embedding {} chunks from {} documents",
            chunks.len(),
            texts.len()
        );

        let index = VectorIndex::build(&chunks, self.embedder.as_ref()).await?;
        self.store.save(&index, self.embedder.name())?;

        Ok(IngestReport {
            document_count: texts.len(),
            chunk_count: chunks.len(),
            index_path: self.store.path().to_path_buf(),
        })
    }

    // ------------------------------------------------------------------------
    // Query Flow
    // ------------------------------------------------------------------------

    /// 질문에 대한 답변 생성
    ///
    /// 매 질의마다 영속화된 인덱스를 새로 로드합니다 (읽기 전용).
    ///
    /// # Errors
    /// 성공한 인제스트가 없으면 `RagError::IndexNotFound`를 반환합니다.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let index = self.store.load(self.embedder.dimension())?;

        let query_embedding = self.embedder.embed(question).await?;
        let results = index.search(&query_embedding, self.retrieval_k);

        tracing::debug!("Retrieved {} chunks for question", results.len());

        let context = build_context(&results);
        let prompt = build_prompt(&context, question);

        let raw = self.generator.generate(&prompt).await?;
        Ok(Answer::from_raw(&raw))
    }
}

// ============================================================================
// Tests
// ============================================================================
