//! 답변 생성 모듈 - Gemini generateContent
//!
//! 검색된 컨텍스트와 질문으로 조립한 프롬프트를 언어 모델에 전달합니다.
//! 모델은 그라운딩 계약을 따라야 합니다 (prompt 모듈 참조).

pub mod prompt;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

// ============================================================================
// AnswerGenerator Trait
// ============================================================================

/// 답변 생성기 트레이트
///
/// 프롬프트를 받아 자연어 답변을 반환하는 인터페이스입니다.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// 프롬프트로부터 답변 생성
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// 생성기 이름
    fn name(&self) -> &str;
}

// ============================================================================
// Google Gemini Generator
// ============================================================================

/// Gemini 생성 API 엔드포인트
const GEMINI_GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// 기본 생성 온도 (결정성과 다양성의 트레이드오프)
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// 최대 출력 토큰 수
const MAX_OUTPUT_TOKENS: u32 = 8192;

/// HTTP 타임아웃
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Google Gemini 생성기 구현체
#[derive(Debug)]
pub struct GeminiGenerator {
    api_key: String,
    client: reqwest::Client,
    temperature: f32,
}

impl GeminiGenerator {
    /// 새 Gemini 생성기 생성 (기본 온도 0.3)
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_temperature(api_key, DEFAULT_TEMPERATURE)
    }

    /// 온도를 지정하여 생성
    pub fn with_temperature(api_key: String, temperature: f32) -> Result<Self> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(RagError::Provider(format!(
                "invalid temperature: {temperature}. Must be in 0.0..=2.0"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RagError::Provider(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            client,
            temperature,
        })
    }

    /// 환경변수에서 API 키를 읽어 생성
    pub fn from_env() -> Result<Self> {
        let api_key = crate::embedding::get_api_key()?;
        Self::new(api_key)
    }

    async fn send_request(&self, request: &GenerateRequest) -> Result<reqwest::Response> {
        self.client
            .post(GEMINI_GENERATE_URL)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| RagError::Provider(format!("failed to send generation request: {e}")))
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<GenerateContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerateContent {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<TextPart>,
}

#[async_trait]
impl AnswerGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![GenerateContent {
                parts: vec![TextPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        // 전송 계층 실패는 1회만 재시도. HTTP 에러 상태는 즉시 실패.
        let response = match self.send_request(&request).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("Generation request failed, retrying once: {e}");
                self.send_request(&request).await?
            }
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RagError::Provider(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(RagError::Provider(format!(
                "Gemini API error ({status}): {body}"
            )));
        }

        let generate_response: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| RagError::Provider(format!("failed to parse generation response: {e}")))?;

        let text = generate_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| RagError::Provider("empty generation response".to_string()))?;

        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini-2.0-flash"
    }
}

// ============================================================================
// Tests
// ============================================================================
