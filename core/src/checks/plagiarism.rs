use crate::checks::normalize::CheckEvaluation;
use crate::detector::interface::{DetectorResponse, Evidence};
use crate::error::CoreResult;
use crate::model::highlight::{Highlight, HighlightEvidence};
use crate::policy::thresholds::Thresholds;
use crate::text::index::TextIndex;
use crate::text::tokenize::words;
use tracing::warn;

/// Scores a normalized detector response for the plagiarism check.
///
/// Matched word ranges become char-offset highlights spanning from the first
/// word's start to the last word's end, only when the score is above the
/// flag threshold. Status is `failed` strictly above the fail threshold.
///
/// A flagged score with no usable word span still gets one highlight:
/// `ceil(word_count * score / 100)` words from the first word, at confidence
/// `score / 100`.
pub fn evaluate_plagiarism(
    text: &str,
    resp: &DetectorResponse,
    thresholds: &Thresholds,
) -> CoreResult<CheckEvaluation> {
    let idx = TextIndex::new(text);
    let ws = words(text);
    let score = resp.score;

    let mut highlights = Vec::new();
    if thresholds.plagiarism_flagged(score) {
        for e in &resp.evidence {
            let Evidence::WordSpan {
                start_word,
                end_word,
                confidence,
                source,
            } = e
            else {
                warn!("ignoring sentence evidence in plagiarism response");
                continue;
            };
            if start_word >= end_word || *end_word > ws.len() {
                warn!(
                    start_word,
                    end_word,
                    word_count = ws.len(),
                    "dropping out-of-range word span"
                );
                continue;
            }
            let start = ws[*start_word].start;
            let end = ws[*end_word - 1].end;
            highlights.push(Highlight::from_range(
                &idx,
                start,
                end,
                *confidence,
                HighlightEvidence::Plagiarism {
                    source: source.clone(),
                },
            )?);
        }
        if highlights.is_empty() && !ws.is_empty() {
            let n = proportional_word_count(ws.len(), score);
            highlights.push(Highlight::from_range(
                &idx,
                ws[0].start,
                ws[n - 1].end,
                score / 100.0,
                HighlightEvidence::Plagiarism { source: None },
            )?);
        }
    }

    Ok(CheckEvaluation {
        score,
        status: thresholds.plagiarism_status(score),
        highlights,
        word_count: Some(ws.len()),
        sentence_count: None,
    })
}

/// Words covered by a score-only match, clamped to `[1, word_count]`.
pub fn proportional_word_count(word_count: usize, score: f64) -> usize {
    let n = ((word_count as f64) * score / 100.0 - 1e-9).ceil() as usize;
    n.clamp(1, word_count.max(1))
}
