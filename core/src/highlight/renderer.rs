use crate::highlight::legend::{legend, LegendEntry};
use crate::model::highlight::{Highlight, HighlightKind};
use crate::text::index::TextIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// A contiguous piece of the source text.
///
/// `highlights` holds indices into [`RenderedText::highlights`] for every
/// highlight covering this piece; empty for plain text. Overlapping ranges
/// from different checks produce one segment carrying all of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub highlights: Vec<usize>,
}

impl Segment {
    pub fn is_plain(&self) -> bool {
        self.highlights.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RejectedHighlight {
    /// Position in the caller's input list.
    pub input_index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderedText {
    pub segments: Vec<Segment>,
    /// Accepted highlights, stable-sorted by `start`.
    pub highlights: Vec<Highlight>,
    pub rejected: Vec<RejectedHighlight>,
    pub legend: Vec<LegendEntry>,
}

impl RenderedText {
    /// Concatenation of all segments; equals the input text.
    pub fn reconstruct(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn highlighted_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| !s.is_plain())
    }

    /// Distinct kinds on one segment, in legend order.
    pub fn kinds_of(&self, segment: &Segment) -> Vec<HighlightKind> {
        let kinds: BTreeSet<HighlightKind> = segment
            .highlights
            .iter()
            .filter_map(|i| self.highlights.get(*i))
            .map(|h| h.kind())
            .collect();
        kinds.into_iter().collect()
    }
}

/// Splits `text` into plain and highlighted segments.
///
/// Highlights whose offsets are empty, inverted or past the end of the text
/// are rejected and reported; the rest still render. Offsets are
/// authoritative over a highlight's stored `text`.
pub fn render_segments(text: &str, highlights: &[Highlight]) -> RenderedText {
    let idx = TextIndex::new(text);

    let mut accepted: Vec<(usize, &Highlight)> = Vec::new();
    let mut rejected = Vec::new();
    for (i, h) in highlights.iter().enumerate() {
        match h.check_bounds(&idx) {
            Ok(()) => accepted.push((i, h)),
            Err(e) => {
                warn!(input_index = i, "rejecting highlight: {}", e);
                rejected.push(RejectedHighlight {
                    input_index: i,
                    reason: e.to_string(),
                });
            }
        }
    }
    // stable: equal starts keep input order
    accepted.sort_by_key(|(_, h)| h.start);
    let sorted: Vec<Highlight> = accepted.into_iter().map(|(_, h)| h.clone()).collect();

    let mut bounds: BTreeSet<usize> = BTreeSet::new();
    bounds.insert(0);
    bounds.insert(idx.len_chars());
    for h in &sorted {
        bounds.insert(h.start);
        bounds.insert(h.end);
    }
    let bounds: Vec<usize> = bounds.into_iter().collect();

    let mut segments = Vec::new();
    for w in bounds.windows(2) {
        let (a, b) = (w[0], w[1]);
        let Some(piece) = idx.slice(a, b) else {
            continue;
        };
        let covering: Vec<usize> = sorted
            .iter()
            .enumerate()
            .filter(|(_, h)| h.start <= a && h.end >= b)
            .map(|(i, _)| i)
            .collect();
        segments.push(Segment {
            start: a,
            end: b,
            text: piece.to_string(),
            highlights: covering,
        });
    }

    RenderedText {
        segments,
        highlights: sorted,
        rejected,
        legend: legend(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::highlight::HighlightEvidence;

    fn hl(start: usize, end: usize, kind: HighlightKind) -> Highlight {
        let evidence = match kind {
            HighlightKind::Plagiarism => HighlightEvidence::Plagiarism { source: None },
            HighlightKind::AiContent => HighlightEvidence::AiContent {
                sentence_index: None,
                reason: None,
            },
        };
        Highlight {
            start,
            end,
            text: String::new(),
            confidence: 0.5,
            evidence,
        }
    }

    #[test]
    fn empty_highlight_list_is_one_plain_segment_with_legend() {
        let r = render_segments("hello", &[]);
        assert_eq!(r.segments.len(), 1);
        assert!(r.segments[0].is_plain());
        assert_eq!(r.reconstruct(), "hello");
        assert_eq!(r.legend.len(), HighlightKind::ALL.len());
    }

    #[test]
    fn empty_text_yields_no_segments() {
        let r = render_segments("", &[]);
        assert!(r.segments.is_empty());
        assert_eq!(r.reconstruct(), "");
    }

    #[test]
    fn overlap_merges_into_dual_tagged_segment() {
        let r = render_segments(
            "ABCDEFGHIJ",
            &[
                hl(2, 6, HighlightKind::Plagiarism),
                hl(4, 8, HighlightKind::AiContent),
            ],
        );
        let texts: Vec<_> = r.segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["AB", "CD", "EF", "GH", "IJ"]);
        assert_eq!(r.segments[2].highlights, vec![0, 1]);
        assert_eq!(
            r.kinds_of(&r.segments[2]),
            vec![HighlightKind::Plagiarism, HighlightKind::AiContent]
        );
        assert_eq!(r.reconstruct(), "ABCDEFGHIJ");
    }

    #[test]
    fn identical_starts_keep_input_order() {
        let r = render_segments(
            "ABCDEF",
            &[
                hl(1, 3, HighlightKind::AiContent),
                hl(1, 3, HighlightKind::Plagiarism),
            ],
        );
        assert_eq!(r.highlights[0].kind(), HighlightKind::AiContent);
        assert_eq!(r.segments[1].highlights, vec![0, 1]);
    }

    #[test]
    fn malformed_highlights_are_rejected_not_fatal() {
        let r = render_segments(
            "ABCDEF",
            &[
                hl(4, 2, HighlightKind::Plagiarism),
                hl(1, 2, HighlightKind::AiContent),
                hl(3, 99, HighlightKind::Plagiarism),
                hl(5, 5, HighlightKind::AiContent),
            ],
        );
        let rejected: Vec<_> = r.rejected.iter().map(|x| x.input_index).collect();
        assert_eq!(rejected, vec![0, 2, 3]);
        assert_eq!(r.highlights.len(), 1);
        assert_eq!(r.highlighted_segments().count(), 1);
        assert_eq!(r.reconstruct(), "ABCDEF");
    }

    #[test]
    fn offsets_count_chars_not_bytes() {
        let r = render_segments("naïve café", &[hl(6, 10, HighlightKind::Plagiarism)]);
        assert_eq!(r.segments[1].text, "café");
        assert_eq!(r.reconstruct(), "naïve café");
    }
}
