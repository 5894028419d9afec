//! health-clique - 건강 기사 판별 도구
//!
//! 사용자가 제출한 URL의 본문을 스크래핑하고, 사전 학습된 이진 분류기로
//! 건강 관련 기사인지 판별합니다.
//!
//! 파이프라인: 검증 → 페치 → 추출 → 분류 → 판정

pub mod classifier;
pub mod cli;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod pipeline;

// Re-exports
pub use classifier::{ClassificationError, Classifier, Label, LinearTextModel, TextModel};
pub use config::{get_data_dir, Config};
pub use extractor::{ExtractedContent, ExtractionError, Extractor, SelectorKind};
pub use fetcher::{FetchError, HttpFetcher, PageFetcher};
pub use pipeline::{
    validate_url, InvalidUrl, Message, MessageKind, Outcome, Pipeline, SubmissionRequest,
};
