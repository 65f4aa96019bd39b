//! Index Store - 벡터 인덱스 영속화
//!
//! 인덱스를 단일 JSON 아티팩트로 저장하고 다시 로드합니다.
//! 저장 위치: ~/.pdfchat-rag/faiss_index.json
//!
//! 쓰기는 임시 파일 작성 후 rename으로 이루어집니다. 동시에 읽는 쪽은
//! 이전 아티팩트 또는 새 아티팩트 중 하나를 온전하게 관찰합니다.
//! 동시 인제스트 쓰기는 최대 1개가 호출자 책임입니다.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

use super::vector::{VectorEntry, VectorIndex};

/// 아티팩트 포맷 버전
const INDEX_FORMAT_VERSION: u32 = 1;

/// 기본 인덱스 파일 이름
pub const DEFAULT_INDEX_NAME: &str = "faiss_index.json";

// ============================================================================
// Data Directory
// ============================================================================

/// 데이터 디렉토리 경로 (~/.pdfchat-rag/)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pdfchat-rag")
}

/// 기본 인덱스 경로 (~/.pdfchat-rag/faiss_index.json)
pub fn default_index_path() -> PathBuf {
    get_data_dir().join(DEFAULT_INDEX_NAME)
}

// ============================================================================
// Persisted Format
// ============================================================================

/// 영속화된 인덱스 아티팩트
#[derive(Debug, Serialize, Deserialize)]
struct PersistedIndex {
    /// 포맷 버전
    version: u32,
    /// 임베딩 모델 이름
    model: String,
    /// 임베딩 차원
    dimension: usize,
    /// 생성 시각
    created_at: DateTime<Utc>,
    /// (청크, 벡터) 엔트리
    entries: Vec<VectorEntry>,
}

/// 인덱스 메타데이터 (status 표시용)
#[derive(Debug, Clone)]
pub struct IndexMetadata {
    pub model: String,
    pub dimension: usize,
    pub created_at: DateTime<Utc>,
    pub chunk_count: usize,
}

// ============================================================================
// IndexStore
// ============================================================================

/// 인덱스 저장소
///
/// 지정된 경로에 인덱스를 통째로 덮어쓰고, 같은 경로에서 다시 로드합니다.
/// 증분 병합은 지원하지 않습니다.
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    /// 경로를 지정하여 생성
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 기본 위치로 생성 (~/.pdfchat-rag/faiss_index.json)
    pub fn open_default() -> Self {
        Self::new(default_index_path())
    }

    /// 인덱스 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 인덱스 존재 여부
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// 인덱스를 아티팩트로 저장 (기존 내용 덮어쓰기)
    ///
    /// 임시 파일에 쓴 뒤 rename하므로 찢어진 파일이 남지 않습니다.
    pub fn save(&self, index: &VectorIndex, model: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let persisted = PersistedIndex {
            version: INDEX_FORMAT_VERSION,
            model: model.to_string(),
            dimension: index.dimension(),
            created_at: Utc::now(),
            entries: index.entries().to_vec(),
        };

        let json = serde_json::to_string(&persisted)
            .map_err(|e| RagError::IndexCorrupt(format!("failed to serialize index: {e}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;

        tracing::info!(
            "Persisted index: {} chunks, dim {}, at {}",
            index.len(),
            index.dimension(),
            self.path.display()
        );

        Ok(())
    }

    /// 아티팩트에서 인덱스 로드
    ///
    /// # Errors
    /// - 아티팩트가 없으면 `RagError::IndexNotFound`
    /// - 읽기/파싱 실패, 버전 불일치, 차원 불일치면 `RagError::IndexCorrupt`
    pub fn load(&self, expected_dimension: usize) -> Result<VectorIndex> {
        let persisted = self.read_artifact()?;

        if persisted.dimension != expected_dimension {
            return Err(RagError::IndexCorrupt(format!(
                "embedding dimension mismatch: index has {}, provider expects {}",
                persisted.dimension, expected_dimension
            )));
        }

        Ok(VectorIndex::from_entries(
            persisted.entries,
            persisted.dimension,
        ))
    }

    /// 아티팩트 메타데이터만 읽기 (차원 검증 없음)
    pub fn metadata(&self) -> Result<IndexMetadata> {
        let persisted = self.read_artifact()?;
        Ok(IndexMetadata {
            model: persisted.model,
            dimension: persisted.dimension,
            created_at: persisted.created_at,
            chunk_count: persisted.entries.len(),
        })
    }

    fn read_artifact(&self) -> Result<PersistedIndex> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RagError::IndexNotFound(self.path.clone()));
            }
            Err(e) => {
                return Err(RagError::IndexCorrupt(format!(
                    "failed to read index artifact: {e}"
                )));
            }
        };

        let persisted: PersistedIndex = serde_json::from_str(&json)
            .map_err(|e| RagError::IndexCorrupt(format!("failed to parse index artifact: {e}")))?;

        if persisted.version != INDEX_FORMAT_VERSION {
            return Err(RagError::IndexCorrupt(format!(
                "unknown index format version: {}",
                persisted.version
            )));
        }

        Ok(persisted)
    }
}

// ============================================================================
// Tests
// ============================================================================
