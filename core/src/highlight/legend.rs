use crate::model::highlight::HighlightKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LegendEntry {
    pub kind: HighlightKind,
    pub label: String,
    pub css_class: String,
    pub description: String,
}

pub fn legend_entry(kind: HighlightKind) -> LegendEntry {
    let (label, description) = match kind {
        HighlightKind::Plagiarism => (
            "Potential plagiarism",
            "Text matching previously published content",
        ),
        HighlightKind::AiContent => (
            "Potential AI content",
            "Text likely produced by an AI writing tool",
        ),
    };
    LegendEntry {
        kind,
        label: label.to_string(),
        css_class: css_class(kind).to_string(),
        description: description.to_string(),
    }
}

pub fn css_class(kind: HighlightKind) -> &'static str {
    match kind {
        HighlightKind::Plagiarism => "hl-plagiarism",
        HighlightKind::AiContent => "hl-ai-content",
    }
}

/// Every registered kind, whether or not it occurs in a given text.
pub fn legend() -> Vec<LegendEntry> {
    HighlightKind::ALL.into_iter().map(legend_entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_lists_every_kind_in_registry_order() {
        let l = legend();
        let kinds: Vec<_> = l.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, HighlightKind::ALL.to_vec());
        assert_eq!(l[1].css_class, "hl-ai-content");
    }
}
