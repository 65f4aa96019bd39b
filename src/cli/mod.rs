//! CLI 모듈
//!
//! pdfchat-rag CLI 명령어 정의 및 구현

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::embedding::has_api_key;
use crate::error::RagError;
use crate::knowledge::{default_index_path, get_data_dir, ChunkConfig, IndexStore};
use crate::pipeline::{RagConfig, RagPipeline};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "pdfchat-rag")]
#[command(version, about = "PDF 질의응답 RAG 시스템", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// PDF 문서들을 인덱싱 (기존 인덱스는 통째로 덮어쓰기)
    Ingest {
        /// 인덱싱할 PDF 파일 경로 (1개 이상)
        #[arg(required = true)]
        pdfs: Vec<PathBuf>,

        /// 최대 청크 크기 (문자 수)
        #[arg(long, default_value = "10000")]
        chunk_size: usize,

        /// 청크 오버랩 (문자 수)
        #[arg(long, default_value = "1000")]
        chunk_overlap: usize,

        /// 인덱스 아티팩트 경로
        #[arg(long)]
        index_path: Option<PathBuf>,
    },

    /// 인덱싱된 문서에 질문
    Ask {
        /// 질문
        question: String,

        /// 검색할 청크 수 (top-k)
        #[arg(short, long, default_value = "4")]
        k: usize,

        /// 생성 온도
        #[arg(long, default_value = "0.3")]
        temperature: f32,

        /// 인덱스 아티팩트 경로
        #[arg(long)]
        index_path: Option<PathBuf>,
    },

    /// 상태 확인
    Status,
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Ingest {
            pdfs,
            chunk_size,
            chunk_overlap,
            index_path,
        } => cmd_ingest(pdfs, chunk_size, chunk_overlap, index_path).await,
        Commands::Ask {
            question,
            k,
            temperature,
            index_path,
        } => cmd_ask(&question, k, temperature, index_path).await,
        Commands::Status => cmd_status().await,
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

/// 인제스트 명령어 (ingest)
///
/// PDF 배치를 추출/청킹/임베딩하여 인덱스를 새로 영속화합니다.
/// 어느 한 파일이라도 실패하면 전체가 중단됩니다.
async fn cmd_ingest(
    pdfs: Vec<PathBuf>,
    chunk_size: usize,
    chunk_overlap: usize,
    index_path: Option<PathBuf>,
) -> Result<()> {
    ensure_api_key()?;

    let config = RagConfig {
        chunk: ChunkConfig::new(chunk_size, chunk_overlap)?,
        index_path: index_path.unwrap_or_else(default_index_path),
        ..Default::default()
    };

    let pipeline = RagPipeline::from_env(config).context("파이프라인 초기화 실패")?;

    // 모든 PDF 바이트 읽기
    let mut documents = Vec::with_capacity(pdfs.len());
    for path in &pdfs {
        let bytes =
            std::fs::read(path).with_context(|| format!("PDF 읽기 실패: {}", path.display()))?;
        documents.push(bytes);
    }

    println!("[*] {} 개 PDF 인덱싱 중...", documents.len());

    let report = pipeline
        .ingest(&documents)
        .await
        .context("인제스트 실패 (인덱스는 변경되지 않았습니다)")?;

    println!(
        "[OK] 완료: 문서 {} 개, 청크 {} 개",
        report.document_count, report.chunk_count
    );
    println!("     인덱스: {}", report.index_path.display());

    Ok(())
}

/// 질문 명령어 (ask)
///
/// 인덱스에서 top-k 청크를 검색하고 답변을 생성합니다.
async fn cmd_ask(
    question: &str,
    k: usize,
    temperature: f32,
    index_path: Option<PathBuf>,
) -> Result<()> {
    ensure_api_key()?;

    if k == 0 {
        bail!("-k는 1 이상이어야 합니다");
    }

    let config = RagConfig {
        retrieval_k: k,
        temperature,
        index_path: index_path.unwrap_or_else(default_index_path),
        ..Default::default()
    };

    let pipeline = RagPipeline::from_env(config).context("파이프라인 초기화 실패")?;

    println!("[*] 질문: \"{question}\"");

    let answer = match pipeline.ask(question).await {
        Ok(answer) => answer,
        Err(RagError::IndexNotFound(path)) => {
            bail!(
                "인덱스가 없습니다: {}\n먼저 인제스트를 실행하세요: pdfchat-rag ingest <pdf>",
                path.display()
            );
        }
        Err(e) => return Err(e).context("질의 실패"),
    };

    println!("\n[OK] 답변:\n{}", answer.into_text());

    Ok(())
}

/// 상태 명령어 (status)
///
/// 시스템 상태를 확인합니다.
async fn cmd_status() -> Result<()> {
    println!("pdfchat-rag v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let data_dir = get_data_dir();
    println!("[*] 데이터 디렉토리: {}", data_dir.display());

    if has_api_key() {
        println!("[OK] API 키: 설정됨");
    } else {
        println!("[!] API 키: 미설정");
        println!("    설정: export GEMINI_API_KEY=your-key");
    }

    let store = IndexStore::open_default();
    match store.metadata() {
        Ok(meta) => {
            println!("[OK] 인덱스: {} 청크", meta.chunk_count);
            println!(
                "     모델: {} (차원 {}), 생성: {}",
                meta.model,
                meta.dimension,
                meta.created_at.format("%Y-%m-%d %H:%M")
            );
        }
        Err(RagError::IndexNotFound(_)) => {
            println!("[!] 인덱스: 없음 (ingest 미실행)");
        }
        Err(e) => {
            println!("[!] 인덱스 확인 실패: {e}");
        }
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// API 키 확인 (없으면 파이프라인 시작 전에 즉시 실패)
fn ensure_api_key() -> Result<()> {
    if !has_api_key() {
        bail!(
            "API 키가 설정되지 않았습니다.\n\n\
             설정 방법:\n  \
             export GEMINI_API_KEY=your-api-key\n  \
             또는\n  \
             export GOOGLE_AI_API_KEY=your-api-key\n\n\
             API 키 발급: https://aistudio.google.com/app/apikey"
        );
    }
    Ok(())
}
