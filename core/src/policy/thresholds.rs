use crate::error::{CoreError, CoreResult};
use crate::model::check_result::ValidationStatus;
use serde::{Deserialize, Serialize};

pub const PLAGIARISM_FAIL_THRESHOLD: f64 = 20.0;
pub const PLAGIARISM_FLAG_THRESHOLD: f64 = 20.0;
pub const AI_CONTENT_HIGHLIGHT_THRESHOLD: f64 = 15.0;
pub const AI_CONTENT_FAIL_THRESHOLD: f64 = 30.0;
pub const AI_CONTENT_SAMPLE_RATIO: f64 = 0.10;

/// Business thresholds, all in percent. Every comparison is strict `>`:
/// a score equal to a threshold stays on the passing / unflagged side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    pub plagiarism_fail: f64,
    pub plagiarism_flag: f64,
    pub ai_content_highlight: f64,
    pub ai_content_fail: f64,
    pub ai_content_sample_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            plagiarism_fail: PLAGIARISM_FAIL_THRESHOLD,
            plagiarism_flag: PLAGIARISM_FLAG_THRESHOLD,
            ai_content_highlight: AI_CONTENT_HIGHLIGHT_THRESHOLD,
            ai_content_fail: AI_CONTENT_FAIL_THRESHOLD,
            ai_content_sample_ratio: AI_CONTENT_SAMPLE_RATIO,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> CoreResult<()> {
        let percents = [
            ("plagiarism_fail", self.plagiarism_fail),
            ("plagiarism_flag", self.plagiarism_flag),
            ("ai_content_highlight", self.ai_content_highlight),
            ("ai_content_fail", self.ai_content_fail),
        ];
        for (name, v) in percents {
            if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                return Err(CoreError::Config(format!(
                    "threshold {} must be within [0, 100], got {}",
                    name, v
                )));
            }
        }
        let r = self.ai_content_sample_ratio;
        if !r.is_finite() || r <= 0.0 || r > 1.0 {
            return Err(CoreError::Config(format!(
                "ai_content_sample_ratio must be within (0, 1], got {}",
                r
            )));
        }
        Ok(())
    }

    pub fn plagiarism_status(&self, score: f64) -> ValidationStatus {
        if score > self.plagiarism_fail {
            ValidationStatus::Failed
        } else {
            ValidationStatus::Passed
        }
    }

    pub fn plagiarism_flagged(&self, score: f64) -> bool {
        score > self.plagiarism_flag
    }

    pub fn ai_content_status(&self, score: f64) -> ValidationStatus {
        if score > self.ai_content_fail {
            ValidationStatus::Failed
        } else {
            ValidationStatus::Passed
        }
    }

    pub fn ai_content_highlighted(&self, score: f64) -> bool {
        score > self.ai_content_highlight
    }
}
