//! 페처 모듈 - URL 원본 HTML 가져오기
//!
//! 단일 GET 요청만 수행합니다. 재시도는 없고, 타임아웃은 설정값을 따릅니다.
//! 전송 오류와 2xx 외 상태 코드는 구분하지 않고 모두 `FetchError`로 전달합니다.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// 기본 User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!("health-clique/", env!("CARGO_PKG_VERSION"));

/// 페치 실패 (원인 문자열 포함)
#[derive(Debug, Error)]
#[error("{cause}")]
pub struct FetchError {
    cause: String,
}

impl FetchError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }

    /// 사람이 읽을 수 있는 원인
    pub fn cause(&self) -> &str {
        &self.cause
    }
}

// ============================================================================
// PageFetcher Trait
// ============================================================================

/// 페이지 페처 트레이트
///
/// `url`은 호출자가 이미 검증한 값이어야 합니다.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// URL의 응답 본문(HTML) 반환
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

// ============================================================================
// HTTP Fetcher
// ============================================================================

/// reqwest 기반 HTTP 페처
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// 타임아웃과 User-Agent를 지정하여 생성
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::new(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::info!("Fetching: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::new(describe(&e)))?;

        let response = response
            .error_for_status()
            .map_err(|e| FetchError::new(describe(&e)))?;

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::new(format!("응답 본문 읽기 실패: {}", describe(&e))))?;

        tracing::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

/// reqwest 에러를 원인 문자열로 변환
fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        return "request timed out".to_string();
    }

    if let Some(status) = err.status() {
        return format!("server responded with {}", status);
    }

    // Display에 하위 원인(DNS, connection refused 등)이 이미 포함됨
    err.to_string()
}

// ============================================================================
// Tests
// ============================================================================
