use serde::{Deserialize, Serialize};
use std::fmt;

/// One piece of evidence reported by a detector, in the detector's native unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum Evidence {
    /// Half-open word range `[start_word, end_word)`.
    WordSpan {
        start_word: usize,
        end_word: usize,
        confidence: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
    Sentence {
        sentence_index: usize,
        confidence: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectorResponse {
    pub score: f64,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectorErrorCategory {
    Timeout,
    Unavailable,
    MalformedResponse,
    RuntimeError,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectorError {
    pub code: String,
    pub message: String,
    pub retryable: bool,
    pub category: DetectorErrorCategory,
}

impl DetectorError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            code: "DETECTOR_MALFORMED_RESPONSE".to_string(),
            message: message.into(),
            retryable: true,
            category: DetectorErrorCategory::MalformedResponse,
        }
    }
}

impl fmt::Display for DetectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// External scoring capability. Implementations must be safe to share across
/// the concurrently running checks of one submission.
pub trait Detector: Send + Sync {
    fn detector_id(&self) -> &str;
    fn score(&self, text: &str) -> Result<DetectorResponse, DetectorError>;
}

pub fn classify_detector_error(err: &str) -> DetectorError {
    let lower = err.to_ascii_lowercase();
    let (category, code, retryable) = if lower.contains("timeout") || lower.contains("timed out") {
        (DetectorErrorCategory::Timeout, "DETECTOR_TIMEOUT", true)
    } else if lower.contains("connection") || lower.contains("unreachable") {
        (
            DetectorErrorCategory::Unavailable,
            "DETECTOR_UNAVAILABLE",
            true,
        )
    } else if lower.contains("parse") || lower.contains("malformed") {
        (
            DetectorErrorCategory::MalformedResponse,
            "DETECTOR_MALFORMED_RESPONSE",
            true,
        )
    } else {
        (
            DetectorErrorCategory::RuntimeError,
            "DETECTOR_RUNTIME_ERROR",
            false,
        )
    };
    DetectorError {
        code: code.to_string(),
        message: err.to_string(),
        retryable,
        category,
    }
}
