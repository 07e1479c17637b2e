use crate::detector::interface::{DetectorError, DetectorResponse, Evidence};
use crate::model::check_result::ValidationStatus;
use crate::model::highlight::{clamp_confidence, Highlight};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Output of one check before it is stamped with run metadata and persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckEvaluation {
    pub score: f64,
    pub status: ValidationStatus,
    pub highlights: Vec<Highlight>,
    pub word_count: Option<usize>,
    pub sentence_count: Option<usize>,
}

/// Scores outside [0, 100] are clamped; NaN and infinities are rejected.
pub fn normalize_score(raw: f64) -> Result<f64, DetectorError> {
    if !raw.is_finite() {
        return Err(DetectorError::malformed(format!(
            "detector returned non-finite score {}",
            raw
        )));
    }
    if !(0.0..=100.0).contains(&raw) {
        warn!(raw_score = raw, "detector score outside [0, 100], clamping");
    }
    Ok(raw.clamp(0.0, 100.0))
}

pub fn normalize_response(resp: DetectorResponse) -> Result<DetectorResponse, DetectorError> {
    let score = normalize_score(resp.score)?;
    let evidence = resp
        .evidence
        .into_iter()
        .map(|e| match e {
            Evidence::WordSpan {
                start_word,
                end_word,
                confidence,
                source,
            } => Evidence::WordSpan {
                start_word,
                end_word,
                confidence: clamp_confidence(confidence),
                source,
            },
            Evidence::Sentence {
                sentence_index,
                confidence,
                reason,
            } => Evidence::Sentence {
                sentence_index,
                confidence: clamp_confidence(confidence),
                reason,
            },
        })
        .collect();
    Ok(DetectorResponse { score, evidence })
}
