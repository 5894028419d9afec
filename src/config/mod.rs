//! 설정 모듈
//!
//! 우선순위: CLI 플래그 > 환경변수 > 기본값

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::fetcher::DEFAULT_USER_AGENT;

/// 모델 아티팩트 경로 환경변수
pub const MODEL_ENV: &str = "HEALTH_CLIQUE_MODEL";
/// 페치 타임아웃(초) 환경변수
pub const TIMEOUT_ENV: &str = "HEALTH_CLIQUE_TIMEOUT_SECS";

/// 기본 페치 타임아웃
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 기본 모델 파일 이름
const MODEL_FILE_NAME: &str = "model.json";

/// 데이터 디렉토리 경로
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".health-clique")
}

/// 실행 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 모델 아티팩트 경로
    pub model_path: PathBuf,
    /// 페치 타임아웃
    pub timeout: Duration,
    /// HTTP User-Agent
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: get_data_dir().join(MODEL_FILE_NAME),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// CLI 값과 환경변수로 설정 구성
    pub fn resolve(model: Option<PathBuf>, timeout_secs: Option<u64>) -> Result<Self> {
        Self::resolve_with(model, timeout_secs, |key| std::env::var(key).ok())
    }

    /// 환경변수 조회 함수를 주입받아 설정 구성
    fn resolve_with(
        model: Option<PathBuf>,
        timeout_secs: Option<u64>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        let env_value = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = model {
            config.model_path = path;
        } else if let Some(path) = env_value(MODEL_ENV) {
            tracing::debug!("Using model path from {}", MODEL_ENV);
            config.model_path = PathBuf::from(path);
        }

        let secs = match timeout_secs {
            Some(secs) => Some(secs),
            None => env_value(TIMEOUT_ENV)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .with_context(|| format!("{} must be a number of seconds: '{}'", TIMEOUT_ENV, raw))
                })
                .transpose()?,
        };

        if let Some(secs) = secs {
            if secs == 0 {
                anyhow::bail!("Fetch timeout must be at least 1 second");
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// 모델 아티팩트 존재 여부
    pub fn model_exists(&self) -> bool {
        self.model_path.is_file()
    }
}

// ============================================================================
// Tests
// ============================================================================
