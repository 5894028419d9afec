//! 분류기 모듈 - 사전 학습된 텍스트 모델 어댑터
//!
//! 모델 내부(특징 추출, 모델 계열)는 `TextModel` 뒤에 숨겨져 있습니다.
//! 어댑터는 모델 호출을 감싸서 어떤 실패도 `ClassificationError`로만 내보냅니다.
//!
//! ## 사용법
//! ```rust,ignore
//! let model = LinearTextModel::load(&config.model_path)?;
//! let classifier = Classifier::new(Arc::new(model));
//! let label = classifier.classify("Cancer affects many.").await?;
//! ```

mod linear;

use std::sync::Arc;

use thiserror::Error;

pub use linear::LinearTextModel;

// ============================================================================
// TextModel Trait
// ============================================================================

/// 사전 학습된 텍스트 모델 트레이트
///
/// 프로세스 시작 시 한 번 로드되고 이후 읽기 전용으로 공유됩니다.
pub trait TextModel: Send + Sync {
    /// 텍스트의 숫자 레이블 예측 (`1.0` = 관련 있음)
    fn predict(&self, text: &str) -> anyhow::Result<f64>;

    /// 모델 이름
    fn name(&self) -> &str;
}

// ============================================================================
// Label
// ============================================================================

/// 이진 분류 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Relevant,
    NotRelevant,
}

/// 관련 있음을 뜻하는 모델 출력값
pub const RELEVANT_VALUE: f64 = 1.0;

impl Label {
    /// 모델 출력값을 레이블로 변환 (`1.0`만 Relevant)
    pub fn from_prediction(value: f64) -> Self {
        if value == RELEVANT_VALUE {
            Label::Relevant
        } else {
            Label::NotRelevant
        }
    }
}

/// 분류 실패
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// 모델 호출이 에러를 반환함
    #[error("{0}")]
    Prediction(String),
    /// 모델 작업이 완료되지 못함 (panic 등)
    #[error("model task aborted: {0}")]
    Aborted(String),
}

// ============================================================================
// Classifier Adapter
// ============================================================================

/// 모델 경계 어댑터
#[derive(Clone)]
pub struct Classifier {
    model: Arc<dyn TextModel>,
}

impl Classifier {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// 모델 이름
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// 텍스트 분류
    ///
    /// 텍스트는 전처리 없이 그대로 모델에 전달됩니다.
    /// 모델 연산은 CPU 바운드이므로 blocking 풀에서 실행합니다.
    pub async fn classify(&self, text: &str) -> Result<Label, ClassificationError> {
        let model = Arc::clone(&self.model);
        let text = text.to_string();

        let value = tokio::task::spawn_blocking(move || model.predict(&text))
            .await
            .map_err(|e| ClassificationError::Aborted(e.to_string()))?
            .map_err(|e| ClassificationError::Prediction(format!("{:#}", e)))?;

        tracing::debug!("Model {} predicted {}", self.model.name(), value);
        Ok(Label::from_prediction(value))
    }
}

// ============================================================================
// Tests
// ============================================================================
