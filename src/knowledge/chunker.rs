//! Text Chunking Module
//!
//! 추출된 텍스트를 임베딩 한도에 맞는 오버랩 청크로 분할합니다.
//! 단어 중간이 잘리지 않도록 구분자 경계(문단 > 줄 > 공백)를 우선합니다.

use anyhow::Result;

// ============================================================================
// Chunk Configuration
// ============================================================================

/// 청킹 설정
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// 최대 청크 크기 (문자 수)
    pub max_characters: usize,
    /// 오버랩 크기 (문자 수)
    pub overlap_characters: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_characters: 10_000,
            overlap_characters: 1_000,
        }
    }
}

impl ChunkConfig {
    /// 설정 생성 (유효성 검증 포함)
    ///
    /// 불변식: `0 < overlap < max`
    pub fn new(max_characters: usize, overlap_characters: usize) -> Result<Self> {
        if overlap_characters == 0 || overlap_characters >= max_characters {
            anyhow::bail!(
                "Invalid chunk config: overlap ({}) must satisfy 0 < overlap < max ({})",
                overlap_characters,
                max_characters
            );
        }
        Ok(Self {
            max_characters,
            overlap_characters,
        })
    }
}

// ============================================================================
// Chunker Trait
// ============================================================================

/// 텍스트 청킹 전략 트레이트
pub trait Chunker: Send + Sync {
    /// 텍스트를 청크로 분할
    fn chunk(&self, text: &str) -> Vec<String>;

    /// 청커 이름
    fn name(&self) -> &'static str;
}

// ============================================================================
// SlidingChunker
// ============================================================================

/// 슬라이딩 윈도우 청커
///
/// 커서에서 최대 L자를 취하되, 윈도우 안의 마지막 구분자 경계에서 끊습니다:
/// - 문단 경계 (`"\n\n"`)
/// - 줄바꿈 (`'\n'`)
/// - 공백 (`' '`)
/// - 구분자가 없으면 L자에서 하드 컷
///
/// 다음 커서는 `끝 - O`로 이동하여 이웃 청크와 정확히 O자를 공유합니다.
pub struct SlidingChunker {
    config: ChunkConfig,
}

impl SlidingChunker {
    /// 설정으로 생성
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// 기본 설정으로 생성 (L=10000, O=1000)
    pub fn with_defaults() -> Self {
        Self::new(ChunkConfig::default())
    }
}

impl Chunker for SlidingChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        // 문자 단위 인덱싱을 위한 바이트 오프셋 테이블
        let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let total_chars = offsets.len();

        if total_chars == 0 {
            return vec![];
        }

        let max = self.config.max_characters;
        let overlap = self.config.overlap_characters;

        // 문자 인덱스 -> 바이트 오프셋
        let byte_at = |ci: usize| {
            if ci >= total_chars {
                text.len()
            } else {
                offsets[ci]
            }
        };

        let mut chunks = Vec::new();
        let mut cursor = 0usize; // 문자 인덱스

        loop {
            let window_end = (cursor + max).min(total_chars);

            // 남은 텍스트가 윈도우 안에 다 들어가면 그대로 마지막 청크
            if window_end == total_chars {
                chunks.push(text[byte_at(cursor)..].to_string());
                break;
            }

            let window = &text[byte_at(cursor)..byte_at(window_end)];
            let break_bytes = find_break_point(window);
            let break_chars = window[..break_bytes].chars().count();

            // 경계 스냅이 청크를 오버랩보다 작게 만들면 커서가 후진하므로
            // 하드 컷으로 폴백
            let chunk_len = if break_chars > overlap {
                break_chars
            } else {
                window_end - cursor
            };

            let end = cursor + chunk_len;
            chunks.push(text[byte_at(cursor)..byte_at(end)].to_string());

            // 이웃과 정확히 O자 공유
            cursor = end - overlap;
        }

        chunks
    }

    fn name(&self) -> &'static str {
        "SlidingChunker"
    }
}

/// 윈도우 안에서 끊을 지점을 찾습니다 (바이트 오프셋, 구분자 뒤)
///
/// 구분자 우선순위: 문단 경계 > 줄바꿈 > 공백.
/// 구분자가 없으면 윈도우 끝(하드 컷)을 반환합니다.
fn find_break_point(window: &str) -> usize {
    if let Some(pos) = window.rfind("\n\n") {
        return pos + 2;
    }
    if let Some(pos) = window.rfind('\n') {
        return pos + 1;
    }
    if let Some(pos) = window.rfind(' ') {
        return pos + 1;
    }
    window.len()
}

// ============================================================================
// Factory Functions
// ============================================================================

/// 기본 청커 생성
pub fn default_chunker() -> Box<dyn Chunker> {
    Box::new(SlidingChunker::with_defaults())
}

/// 슬라이딩 청커 생성 (설정 지정)
pub fn sliding_chunker(config: ChunkConfig) -> Box<dyn Chunker> {
    Box::new(SlidingChunker::new(config))
}

// ============================================================================
// Tests
// ============================================================================
