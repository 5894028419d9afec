//! health-clique CLI 진입점

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<ExitCode> {
    // 로깅 초기화
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // CLI 실행
    let cli = health_clique::cli::Cli::parse();

    // 제출은 한 번에 하나씩 처리되므로 단일 스레드 런타임 사용
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(health_clique::cli::run(cli))
}
