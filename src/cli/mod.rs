//! CLI 모듈
//!
//! health-clique 명령어 정의 및 구현.
//! URL/주제 입력을 받아 파이프라인을 호출하고 결과 메시지를 출력합니다.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::classifier::{Classifier, LinearTextModel, TextModel};
use crate::config::{get_data_dir, Config, MODEL_ENV};
use crate::extractor::{selector_for, Extractor};
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::pipeline::{
    validate_url, Message, MessageKind, Outcome, Pipeline, SubmissionRequest,
};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "health-clique")]
#[command(version, about = "Health Article Repository - 건강 기사 판별 도구", long_about = None)]
pub struct Cli {
    /// 모델 아티팩트 경로 (기본: 데이터 디렉토리의 model.json)
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// 페치 타임아웃 (초)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 기사 URL 제출
    Submit {
        /// 기사 URL
        #[arg(short, long)]
        url: String,

        /// 기사 주제 (예: Cancer, HIV/AIDS)
        #[arg(short, long, default_value = "")]
        topic: String,
    },

    /// 대화형 입력 (빈 URL 입력 시 종료)
    Interactive,

    /// 페치 + 추출 결과만 확인 (분류하지 않음)
    Extract {
        /// 기사 URL
        #[arg(short, long)]
        url: String,

        /// 출력할 최대 문자 수 (0이면 전체)
        #[arg(short, long, default_value = "500")]
        limit: usize,
    },

    /// 상태 확인
    Status,
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::resolve(cli.model, cli.timeout)?;

    match cli.command {
        Commands::Submit { url, topic } => cmd_submit(&config, url, topic).await,
        Commands::Interactive => cmd_interactive(&config).await,
        Commands::Extract { url, limit } => cmd_extract(&config, &url, limit).await,
        Commands::Status => cmd_status(&config),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

/// 모델과 페처를 준비하여 파이프라인 생성
///
/// 모델은 프로세스당 한 번만 로드됩니다.
fn build_pipeline(config: &Config) -> Result<Pipeline> {
    if !config.model_exists() {
        bail!(
            "모델 파일을 찾을 수 없습니다: {}\n\n\
             설정 방법:\n  \
             health-clique --model /path/to/model.json ...\n  \
             또는\n  \
             export {}=/path/to/model.json",
            config.model_path.display(),
            MODEL_ENV
        );
    }

    let model = LinearTextModel::load(&config.model_path).context("모델 로드 실패")?;
    let fetcher =
        HttpFetcher::new(config.timeout, &config.user_agent).context("HttpFetcher 생성 실패")?;

    Ok(Pipeline::new(
        Box::new(fetcher),
        Classifier::new(Arc::new(model)),
    ))
}

/// 제출 명령어 (submit)
async fn cmd_submit(config: &Config, url: String, topic: String) -> Result<ExitCode> {
    let pipeline = build_pipeline(config)?;

    let outcome = pipeline.submit(&SubmissionRequest::new(url, topic)).await;
    print_message(&outcome.render());

    Ok(if outcome.is_decided() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// 대화형 명령어 (interactive)
async fn cmd_interactive(config: &Config) -> Result<ExitCode> {
    let pipeline = build_pipeline(config)?;

    println!("Health Article Repository");
    println!("(빈 URL을 입력하면 종료합니다)");
    println!();

    let outcomes = run_session(&pipeline, BufReader::new(tokio::io::stdin())).await?;
    tracing::debug!("Interactive session ended after {} submissions", outcomes.len());

    Ok(ExitCode::SUCCESS)
}

/// 입력 스트림에서 주제/URL 쌍을 읽어 순서대로 제출
///
/// 한 번에 하나의 제출만 처리합니다. 빈 URL 또는 EOF에서 종료합니다.
async fn run_session<R>(pipeline: &Pipeline, reader: R) -> Result<Vec<Outcome>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut outcomes = Vec::new();

    loop {
        prompt("Topic of your article (e.g., Cancer, HIV/AIDS): ")?;
        let Some(topic) = lines.next_line().await.context("입력 읽기 실패")? else {
            break;
        };

        prompt("Enter the URL of the article: ")?;
        let Some(url) = lines.next_line().await.context("입력 읽기 실패")? else {
            break;
        };

        if url.trim().is_empty() {
            break;
        }

        let outcome = pipeline
            .submit(&SubmissionRequest::new(url, topic.trim()))
            .await;
        print_message(&outcome.render());
        println!();

        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// 추출 명령어 (extract)
///
/// 사이트 셀렉터 테이블 점검용. 모델을 로드하지 않습니다.
async fn cmd_extract(config: &Config, url: &str, limit: usize) -> Result<ExitCode> {
    if let Err(e) = validate_url(url) {
        bail!("잘못된 URL: {}", e);
    }
    let url = url.trim();

    let fetcher =
        HttpFetcher::new(config.timeout, &config.user_agent).context("HttpFetcher 생성 실패")?;

    println!("[*] 페치 중: {}", url);
    let html = fetcher.fetch(url).await.context("페치 실패")?;

    let kind = selector_for(url);
    println!("[*] 셀렉터: <{}>", kind.css());

    let content = Extractor::new()
        .extract(&html, url)
        .context("추출 실패")?;

    println!(
        "[OK] 추출 완료 ({} chars)\n",
        content.text.chars().count()
    );

    if limit == 0 {
        println!("{}", content.text);
    } else {
        println!("{}", truncate_text(&content.text, limit));
    }

    Ok(ExitCode::SUCCESS)
}

/// 상태 명령어 (status)
fn cmd_status(config: &Config) -> Result<ExitCode> {
    println!("health-clique v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("[*] 데이터 디렉토리: {}", get_data_dir().display());
    println!("[*] 모델 경로: {}", config.model_path.display());
    println!("[*] 페치 타임아웃: {}s", config.timeout.as_secs());

    if !config.model_exists() {
        println!("[!] 모델: 없음");
        println!("    설정: export {}=/path/to/model.json", MODEL_ENV);
        return Ok(ExitCode::SUCCESS);
    }

    if let Ok(metadata) = std::fs::metadata(&config.model_path) {
        println!("[*] 모델 크기: {}", format_bytes(metadata.len() as usize));
    }

    match LinearTextModel::load(&config.model_path) {
        Ok(model) => {
            println!(
                "[OK] 모델: {} ({} weights)",
                model.name(),
                model.vocabulary_size()
            );
        }
        Err(e) => {
            println!("[!] 모델 로드 실패: {:#}", e);
        }
    }

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 메시지 출력 (분류별 접두사)
fn print_message(message: &Message) {
    let prefix = match message.kind {
        MessageKind::Success => "[OK]",
        MessageKind::Warning => "[!]",
        MessageKind::InputError => "[X]",
        MessageKind::Error => "[ERROR]",
    };

    match message.kind {
        MessageKind::Success | MessageKind::Warning => println!("{} {}", prefix, message.text),
        MessageKind::InputError | MessageKind::Error => eprintln!("{} {}", prefix, message.text),
    }
}

/// 프롬프트 출력 (줄바꿈 없음)
fn prompt(text: &str) -> Result<()> {
    print!("{}", text);
    std::io::stdout().flush().context("stdout flush 실패")
}

/// 텍스트 자르기 (UTF-8 안전)
fn truncate_text(text: &str, max_chars: usize) -> String {
    let cleaned = text.replace('\n', " ").replace('\r', "");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() <= max_chars {
        cleaned.to_string()
    } else {
        let truncated: String = cleaned.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

/// 바이트 크기 포맷팅
fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

// ============================================================================
// Tests
// ============================================================================
