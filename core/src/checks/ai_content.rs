use crate::checks::normalize::CheckEvaluation;
use crate::detector::interface::{DetectorResponse, Evidence};
use crate::error::CoreResult;
use crate::model::highlight::{Highlight, HighlightEvidence};
use crate::policy::thresholds::Thresholds;
use crate::text::index::TextIndex;
use crate::text::tokenize::{sentences, Sentence};
use std::collections::BTreeMap;
use tracing::warn;

pub const DEFAULT_AI_REASON: &str = "Sentence pattern consistent with AI-generated text";

/// Scores a normalized detector response for the AI-content check.
///
/// Highlights appear above the (lower) highlight threshold, so a passing
/// result can still carry highlights. Sentence evidence from the detector is
/// used when present; otherwise a proportional, evenly spaced sample of
/// sentences is flagged. Sentence indices are translated to char offsets.
pub fn evaluate_ai_content(
    text: &str,
    resp: &DetectorResponse,
    thresholds: &Thresholds,
) -> CoreResult<CheckEvaluation> {
    let idx = TextIndex::new(text);
    let sents = sentences(text)?;
    let score = resp.score;

    let mut highlights = Vec::new();
    if thresholds.ai_content_highlighted(score) && !sents.is_empty() {
        // keyed by sentence index: duplicates collapse, output is sorted
        let mut picked: BTreeMap<usize, (f64, Option<String>)> = BTreeMap::new();
        for e in &resp.evidence {
            match e {
                Evidence::Sentence {
                    sentence_index,
                    confidence,
                    reason,
                } if *sentence_index < sents.len() => {
                    picked.insert(*sentence_index, (*confidence, reason.clone()));
                }
                Evidence::Sentence { sentence_index, .. } => {
                    warn!(
                        sentence_index,
                        sentence_count = sents.len(),
                        "dropping out-of-range sentence evidence"
                    );
                }
                Evidence::WordSpan { .. } => {
                    warn!("ignoring word-span evidence in ai_content response");
                }
            }
        }
        if picked.is_empty() {
            let confidence = score / 100.0;
            for i in sample_sentence_indices(sents.len(), thresholds.ai_content_sample_ratio) {
                picked.insert(i, (confidence, Some(DEFAULT_AI_REASON.to_string())));
            }
        }
        for (i, (confidence, reason)) in picked {
            highlights.push(sentence_highlight(&idx, &sents[i], confidence, reason)?);
        }
    }

    Ok(CheckEvaluation {
        score,
        status: thresholds.ai_content_status(score),
        highlights,
        word_count: None,
        sentence_count: Some(sents.len()),
    })
}

/// `ceil(n * ratio)` indices clamped to `[1, n]`, spread evenly from the start.
pub fn sample_sentence_indices(n: usize, ratio: f64) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    // epsilon absorbs float noise such as 30 * 0.1 = 3.0000000000000004
    let k = ((n as f64) * ratio - 1e-9).ceil() as usize;
    let k = k.clamp(1, n);
    (0..k).map(|i| i * n / k).collect()
}

fn sentence_highlight(
    idx: &TextIndex<'_>,
    s: &Sentence,
    confidence: f64,
    reason: Option<String>,
) -> CoreResult<Highlight> {
    Highlight::from_range(
        idx,
        s.start,
        s.end,
        confidence,
        HighlightEvidence::AiContent {
            sentence_index: Some(s.index),
            reason,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::check_result::ValidationStatus;

    const THREE: &str = "Sentence one. Sentence two. Sentence three.";

    fn score_only(score: f64) -> DetectorResponse {
        DetectorResponse {
            score,
            evidence: Vec::new(),
        }
    }

    #[test]
    fn sampling_is_proportional_and_spread() {
        assert_eq!(sample_sentence_indices(0, 0.1), Vec::<usize>::new());
        assert_eq!(sample_sentence_indices(3, 0.1), vec![0]);
        assert_eq!(sample_sentence_indices(20, 0.1), vec![0, 10]);
        assert_eq!(sample_sentence_indices(30, 0.1), vec![0, 10, 20]);
        assert_eq!(sample_sentence_indices(25, 0.1), vec![0, 8, 16]);
        assert_eq!(sample_sentence_indices(4, 1.0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn below_highlight_threshold_has_no_highlights() {
        let ev = evaluate_ai_content(THREE, &score_only(10.0), &Thresholds::default()).unwrap();
        assert_eq!(ev.status, ValidationStatus::Passed);
        assert_eq!(ev.sentence_count, Some(3));
        assert!(ev.highlights.is_empty());
    }

    #[test]
    fn between_thresholds_passes_with_highlights() {
        let ev = evaluate_ai_content(THREE, &score_only(20.0), &Thresholds::default()).unwrap();
        assert_eq!(ev.status, ValidationStatus::Passed);
        assert_eq!(ev.highlights.len(), 1);
        let h = &ev.highlights[0];
        assert_eq!(h.text, "Sentence one");
        assert_eq!(h.confidence, 0.2);
        assert_eq!(h.reason(), Some(DEFAULT_AI_REASON));
    }

    #[test]
    fn detector_sentence_evidence_wins_over_sampling() {
        let resp = DetectorResponse {
            score: 45.0,
            evidence: vec![
                Evidence::Sentence {
                    sentence_index: 2,
                    confidence: 0.9,
                    reason: Some("low perplexity".to_string()),
                },
                Evidence::Sentence {
                    sentence_index: 7,
                    confidence: 0.9,
                    reason: None,
                },
            ],
        };
        let ev = evaluate_ai_content(THREE, &resp, &Thresholds::default()).unwrap();
        assert_eq!(ev.status, ValidationStatus::Failed);
        assert_eq!(ev.highlights.len(), 1);
        assert_eq!(ev.highlights[0].text, "Sentence three");
        assert_eq!((ev.highlights[0].start, ev.highlights[0].end), (28, 42));
    }
}
