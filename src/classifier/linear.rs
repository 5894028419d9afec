//! 선형 Bag-of-Words 텍스트 모델
//!
//! 단일 JSON 아티팩트에서 로드됩니다.
//!
//! ```json
//! { "name": "health-text-v1", "bias": -0.5, "threshold": 0.0,
//!   "lowercase": true, "weights": { "cancer": 1.2, "football": -1.0 } }
//! ```
//!
//! 점수 = bias + Σ weight(token), 점수 > threshold 이면 `1.0`, 아니면 `0.0`.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Deserialize;

use super::TextModel;

/// 토큰 패턴 (문자/숫자 연속)
const TOKEN_PATTERN: &str = r"[\p{L}\p{N}]+";

/// 직렬화된 모델 아티팩트
#[derive(Debug, Clone, Deserialize)]
struct ModelArtifact {
    name: String,
    #[serde(default)]
    bias: f64,
    #[serde(default)]
    threshold: f64,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    weights: HashMap<String, f64>,
}

fn default_lowercase() -> bool {
    true
}

/// 선형 텍스트 모델
#[derive(Debug)]
pub struct LinearTextModel {
    artifact: ModelArtifact,
    tokenizer: Regex,
}

impl LinearTextModel {
    /// 아티팩트 파일에서 로드
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact: {:?}", path))?;

        let model = Self::from_json(&raw)
            .with_context(|| format!("Invalid model artifact: {:?}", path))?;

        tracing::info!(
            "Loaded model '{}' ({} weights) from {:?}",
            model.artifact.name,
            model.artifact.weights.len(),
            path
        );
        Ok(model)
    }

    /// JSON 문자열에서 생성
    pub fn from_json(raw: &str) -> Result<Self> {
        let artifact: ModelArtifact =
            serde_json::from_str(raw).context("Failed to parse model JSON")?;

        if artifact.weights.is_empty() {
            bail!("Model '{}' has no weights", artifact.name);
        }

        if !artifact.bias.is_finite() || !artifact.threshold.is_finite() {
            bail!("Model '{}' has a non-finite bias or threshold", artifact.name);
        }

        if let Some((token, _)) = artifact.weights.iter().find(|(_, w)| !w.is_finite()) {
            bail!("Model '{}' has a non-finite weight for '{}'", artifact.name, token);
        }

        let tokenizer = Regex::new(TOKEN_PATTERN).context("Failed to build tokenizer")?;

        Ok(Self {
            artifact,
            tokenizer,
        })
    }

    /// 가중치 개수
    pub fn vocabulary_size(&self) -> usize {
        self.artifact.weights.len()
    }

    /// 원시 점수 계산
    pub fn score(&self, text: &str) -> f64 {
        let text = if self.artifact.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        self.tokenizer
            .find_iter(&text)
            .filter_map(|m| self.artifact.weights.get(m.as_str()))
            .fold(self.artifact.bias, |acc, w| acc + w)
    }
}

impl TextModel for LinearTextModel {
    fn predict(&self, text: &str) -> Result<f64> {
        let score = self.score(text);
        if !score.is_finite() {
            bail!("Score overflowed for model '{}'", self.artifact.name);
        }

        Ok(if score > self.artifact.threshold { 1.0 } else { 0.0 })
    }

    fn name(&self) -> &str {
        &self.artifact.name
    }
}

// ============================================================================
// Tests
// ============================================================================
