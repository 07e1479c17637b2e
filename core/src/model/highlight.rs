use crate::error::{CoreError, CoreResult};
use crate::text::index::TextIndex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    Plagiarism,
    AiContent,
}

impl HighlightKind {
    pub const ALL: [HighlightKind; 2] = [HighlightKind::Plagiarism, HighlightKind::AiContent];

    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightKind::Plagiarism => "plagiarism",
            HighlightKind::AiContent => "ai_content",
        }
    }
}

/// Type-specific payload. Serialized with the `type` tag flattened into the highlight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HighlightEvidence {
    Plagiarism {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
    AiContent {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sentence_index: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

/// A flagged span. `start`/`end` are char offsets, `text` mirrors `source_text[start..end]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub confidence: f64,
    #[serde(flatten)]
    pub evidence: HighlightEvidence,
}

impl Highlight {
    /// Builds a highlight by slicing `idx`, so offsets and text agree.
    pub fn from_range(
        idx: &TextIndex<'_>,
        start: usize,
        end: usize,
        confidence: f64,
        evidence: HighlightEvidence,
    ) -> CoreResult<Self> {
        if start >= end {
            return Err(CoreError::MalformedHighlight(format!(
                "empty or inverted range {}..{}",
                start, end
            )));
        }
        let text = idx.slice(start, end).ok_or_else(|| {
            CoreError::MalformedHighlight(format!(
                "range {}..{} exceeds text length {}",
                start,
                end,
                idx.len_chars()
            ))
        })?;
        Ok(Self {
            start,
            end,
            text: text.to_string(),
            confidence: clamp_confidence(confidence),
            evidence,
        })
    }

    pub fn kind(&self) -> HighlightKind {
        match self.evidence {
            HighlightEvidence::Plagiarism { .. } => HighlightKind::Plagiarism,
            HighlightEvidence::AiContent { .. } => HighlightKind::AiContent,
        }
    }

    pub fn source(&self) -> Option<&str> {
        match &self.evidence {
            HighlightEvidence::Plagiarism { source } => source.as_deref(),
            HighlightEvidence::AiContent { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match &self.evidence {
            HighlightEvidence::AiContent { reason, .. } => reason.as_deref(),
            HighlightEvidence::Plagiarism { .. } => None,
        }
    }

    /// Offsets must satisfy `start < end <= len_chars(text)`.
    pub fn check_bounds(&self, idx: &TextIndex<'_>) -> CoreResult<()> {
        if self.start >= self.end {
            return Err(CoreError::MalformedHighlight(format!(
                "start {} is not before end {}",
                self.start, self.end
            )));
        }
        if self.end > idx.len_chars() {
            return Err(CoreError::MalformedHighlight(format!(
                "end {} exceeds text length {}",
                self.end,
                idx.len_chars()
            )));
        }
        Ok(())
    }

    /// Bounds plus agreement between the denormalized `text` and the offsets.
    pub fn check_against(&self, idx: &TextIndex<'_>) -> CoreResult<()> {
        self.check_bounds(idx)?;
        if idx.slice(self.start, self.end) != Some(self.text.as_str()) {
            return Err(CoreError::MalformedHighlight(format!(
                "text does not match range {}..{}",
                self.start, self.end
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(CoreError::MalformedHighlight(format!(
                "confidence {} outside [0, 1]",
                self.confidence
            )));
        }
        Ok(())
    }
}

pub fn clamp_confidence(c: f64) -> f64 {
    if c.is_finite() {
        c.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
