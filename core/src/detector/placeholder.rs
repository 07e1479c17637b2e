//! Seeded stand-in for a third-party detector.
//!
//! Scores are drawn uniformly from a configured range and a plagiarism run
//! reports one random matched word span. Useful for wiring the pipeline end
//! to end before a real detector is integrated; tests should prefer a
//! deterministic fake implementing [`Detector`] directly.

use crate::detector::interface::{Detector, DetectorError, DetectorResponse, Evidence};
use crate::error::{CoreError, CoreResult};
use crate::model::check_result::CheckType;
use crate::text::tokenize::word_count;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

const MAX_SPAN_WORDS: usize = 12;
const PLACEHOLDER_SOURCE: &str = "https://example.com/matched-source";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceholderDetectorConfig {
    pub seed: u64,
    pub min_score: f64,
    pub max_score: f64,
}

impl PlaceholderDetectorConfig {
    pub fn plagiarism_default() -> Self {
        Self {
            seed: 7,
            min_score: 0.0,
            max_score: 30.0,
        }
    }

    pub fn ai_content_default() -> Self {
        Self {
            seed: 11,
            min_score: 0.0,
            max_score: 40.0,
        }
    }
}

pub struct PlaceholderDetector {
    id: String,
    check_type: CheckType,
    cfg: PlaceholderDetectorConfig,
    rng: Mutex<StdRng>,
}

impl PlaceholderDetector {
    pub fn new(check_type: CheckType, cfg: PlaceholderDetectorConfig) -> CoreResult<Self> {
        if !(cfg.min_score.is_finite() && cfg.max_score.is_finite())
            || cfg.min_score < 0.0
            || cfg.max_score > 100.0
            || cfg.min_score >= cfg.max_score
        {
            return Err(CoreError::Config(format!(
                "placeholder score range {}..{} must be a non-empty range within [0, 100]",
                cfg.min_score, cfg.max_score
            )));
        }
        Ok(Self {
            id: format!("placeholder_{}_v1", check_type.as_str()),
            check_type,
            rng: Mutex::new(StdRng::seed_from_u64(cfg.seed)),
            cfg,
        })
    }
}

impl Detector for PlaceholderDetector {
    fn detector_id(&self) -> &str {
        &self.id
    }

    fn score(&self, text: &str) -> Result<DetectorResponse, DetectorError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| DetectorError::malformed("placeholder rng lock poisoned"))?;
        let score = rng.gen_range(self.cfg.min_score..self.cfg.max_score);

        let evidence = match self.check_type {
            CheckType::Plagiarism => {
                let n = word_count(text);
                if n == 0 {
                    Vec::new()
                } else {
                    let len = rng.gen_range(1..=MAX_SPAN_WORDS.min(n));
                    let start_word = rng.gen_range(0..=n - len);
                    vec![Evidence::WordSpan {
                        start_word,
                        end_word: start_word + len,
                        confidence: rng.gen_range(0.7..1.0),
                        source: Some(PLACEHOLDER_SOURCE.to_string()),
                    }]
                }
            }
            // Sentence sampling is left to the check itself.
            CheckType::AiContent => Vec::new(),
        };
        Ok(DetectorResponse { score, evidence })
    }
}
