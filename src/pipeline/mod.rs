//! 파이프라인 모듈 - 검증 → 페치 → 추출 → 분류 → 판정
//!
//! 모든 실패는 `submit` 경계에서 `Outcome`으로 변환되며 그 밖으로 전파되지 않습니다.
//! 첫 실패에서 종료하는 선형 상태 머신입니다.

use thiserror::Error;
use url::{Host, Url};

use crate::classifier::{ClassificationError, Classifier, Label};
use crate::extractor::Extractor;
use crate::fetcher::PageFetcher;

// ============================================================================
// Request / Outcome
// ============================================================================

/// 사용자 제출 요청 (저장되지 않음)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub url: String,
    /// 자유 입력 주제 (비어 있을 수 있음)
    pub topic: String,
}

impl SubmissionRequest {
    pub fn new(url: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            topic: topic.into(),
        }
    }
}

/// 제출 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted(String),
    Rejected(String),
    InvalidInput(String),
    FetchFailed(String),
    ExtractionFailed(String),
    ClassificationFailed(String),
    /// 분류되지 않은 실패 (모델 작업 중단 시에만 발생)
    Unexpected(String),
}

/// 메시지 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Warning,
    InputError,
    Error,
}

/// 사용자에게 보여줄 메시지
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Outcome {
    /// 제출이 끝까지 처리되었는지 (수락 또는 거절)
    pub fn is_decided(&self) -> bool {
        matches!(self, Outcome::Accepted(_) | Outcome::Rejected(_))
    }

    /// 메시지 템플릿 적용
    pub fn render(&self) -> Message {
        let (kind, text) = match self {
            Outcome::Accepted(topic) => (
                MessageKind::Success,
                format!(
                    "Thank you for adding to the Health Clique! Your article on '{}' has been saved.",
                    topic
                ),
            ),
            Outcome::Rejected(topic) => (
                MessageKind::Warning,
                format!(
                    "Sorry, your article on '{}' is not health-related and cannot be saved. Try again.",
                    topic
                ),
            ),
            Outcome::InvalidInput(reason) => (
                MessageKind::InputError,
                format!(
                    "Non-URL text entered. Please enter a valid URL and try again. ({})",
                    reason
                ),
            ),
            Outcome::FetchFailed(reason) => (
                MessageKind::Error,
                format!("Error retrieving content from the URL: {}", reason),
            ),
            Outcome::ExtractionFailed(reason) => (MessageKind::Error, format!("Error: {}", reason)),
            Outcome::ClassificationFailed(reason) => (
                MessageKind::Error,
                format!("Model Prediction Error: {}", reason),
            ),
            Outcome::Unexpected(reason) => (
                MessageKind::Error,
                format!("An unexpected error occurred ({}). Please try again.", reason),
            ),
        };

        Message { kind, text }
    }
}

// ============================================================================
// URL Validation
// ============================================================================

/// URL 검증 실패
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidUrl {
    #[error("no URL entered")]
    Empty,
    #[error("not a URL: {0}")]
    Malformed(String),
    #[error("unsupported scheme '{0}' (only http/https allowed)")]
    Scheme(String),
    #[error("URL has no host")]
    MissingHost,
    #[error("invalid host '{0}'")]
    Host(String),
}

/// URL 구문 검증 (http/https 절대 URL만 허용)
///
/// 입력은 `http://` 또는 `https://`로 시작해야 하며, 파서의 관대한 보정
/// (`http:example.com` → `http://example.com/`, `http://1` → `http://0.0.0.1/`)은 거부됩니다.
pub fn validate_url(raw: &str) -> Result<Url, InvalidUrl> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(InvalidUrl::Empty);
    }

    let parsed = Url::parse(raw).map_err(|e| InvalidUrl::Malformed(e.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(InvalidUrl::Scheme(parsed.scheme().to_string()));
    }

    // 스킴 뒤에 "//"가 그대로 있어야 함
    let prefix = format!("{}://", parsed.scheme());
    let has_prefix = raw
        .get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(&prefix))
        .unwrap_or(false);
    if !has_prefix {
        return Err(InvalidUrl::Malformed(format!("expected '{}' prefix", prefix)));
    }

    match parsed.host() {
        None => Err(InvalidUrl::MissingHost),
        Some(Host::Domain(domain)) if is_valid_domain(domain) => Ok(parsed),
        Some(Host::Domain(domain)) => Err(InvalidUrl::Host(domain.to_string())),
        // 축약형 IPv4 (예: "1")는 입력에 점 네 자리 형태로 적혀 있어야 함
        Some(Host::Ipv4(addr)) if raw[prefix.len()..].starts_with(&addr.to_string()) => Ok(parsed),
        Some(Host::Ipv4(addr)) => Err(InvalidUrl::Host(addr.to_string())),
        Some(Host::Ipv6(_)) => Ok(parsed),
    }
}

/// 도메인 라벨 검사: 영숫자/하이픈, 하이픈으로 시작·끝나지 않음, 알파벳 TLD
fn is_valid_domain(domain: &str) -> bool {
    if domain.eq_ignore_ascii_case("localhost") {
        return true;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    let tld = labels[labels.len() - 1];
    let tld_ok = tld.len() >= 2
        && (tld.chars().all(|c| c.is_ascii_alphabetic()) || tld.starts_with("xn--"));

    labels_ok && tld_ok
}

// ============================================================================
// Pipeline
// ============================================================================

/// 제출 파이프라인
pub struct Pipeline {
    fetcher: Box<dyn PageFetcher>,
    extractor: Extractor,
    classifier: Classifier,
}

impl Pipeline {
    pub fn new(fetcher: Box<dyn PageFetcher>, classifier: Classifier) -> Self {
        Self {
            fetcher,
            extractor: Extractor::new(),
            classifier,
        }
    }

    /// 요청 하나를 끝까지 처리
    pub async fn submit(&self, request: &SubmissionRequest) -> Outcome {
        let outcome = self.run(request).await;

        if outcome.is_decided() {
            tracing::info!("Submission for {} finished: {:?}", request.url, outcome);
        } else {
            tracing::warn!("Submission for {} failed: {:?}", request.url, outcome);
        }

        outcome
    }

    async fn run(&self, request: &SubmissionRequest) -> Outcome {
        tracing::debug!("VALIDATING {:?}", request.url);
        let url = match validate_url(&request.url) {
            Ok(url) => url,
            Err(e) => return Outcome::InvalidInput(e.to_string()),
        };
        // 검증 후에는 사용자가 입력한 문자열을 그대로 사용 (사이트 테이블 매칭 포함)
        let source_url = request.url.trim();

        tracing::debug!("FETCHING {}", url);
        let html = match self.fetcher.fetch(source_url).await {
            Ok(html) => html,
            Err(e) => return Outcome::FetchFailed(e.to_string()),
        };

        tracing::debug!("EXTRACTING {} bytes", html.len());
        let content = match self.extractor.extract(&html, source_url) {
            Ok(content) => content,
            Err(e) => return Outcome::ExtractionFailed(e.to_string()),
        };

        tracing::debug!("CLASSIFYING {} chars", content.text.len());
        let label = match self.classifier.classify(&content.text).await {
            Ok(label) => label,
            Err(ClassificationError::Prediction(cause)) => {
                return Outcome::ClassificationFailed(cause)
            }
            Err(e @ ClassificationError::Aborted(_)) => return Outcome::Unexpected(e.to_string()),
        };

        tracing::debug!("DECIDING {:?}", label);
        match label {
            Label::Relevant => Outcome::Accepted(request.topic.clone()),
            Label::NotRelevant => Outcome::Rejected(request.topic.clone()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
