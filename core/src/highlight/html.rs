use crate::highlight::legend::css_class;
use crate::highlight::renderer::{RenderedText, Segment};
use crate::model::highlight::Highlight;
use serde::{Deserialize, Serialize};

/// What the popover for one highlight shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HighlightDetail {
    pub kind_label: String,
    pub confidence_pct: String,
    pub source: Option<String>,
    pub reason: Option<String>,
    pub excerpt: String,
}

impl HighlightDetail {
    pub fn of(h: &Highlight) -> Self {
        Self {
            kind_label: crate::highlight::legend::legend_entry(h.kind()).label,
            confidence_pct: format!("{:.0}%", h.confidence * 100.0),
            source: h.source().map(str::to_string),
            reason: h.reason().map(str::to_string),
            excerpt: h.text.clone(),
        }
    }
}

/// Which highlight's detail is open. At most one at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightPanel {
    open: Option<usize>,
}

impl HighlightPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) -> Option<usize> {
        self.open
    }

    /// Opens `index`, or closes it if it is already open.
    pub fn toggle(&mut self, index: usize) {
        self.open = if self.open == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn open_detail(&self, rendered: &RenderedText) -> Option<HighlightDetail> {
        self.open
            .and_then(|i| rendered.highlights.get(i))
            .map(HighlightDetail::of)
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_segment(rendered: &RenderedText, seg: &Segment) -> String {
    let text = escape_html(&seg.text);
    if seg.is_plain() {
        return text;
    }
    let classes: Vec<&str> = rendered
        .kinds_of(seg)
        .into_iter()
        .map(css_class)
        .collect();
    let ids: Vec<String> = seg.highlights.iter().map(|i| i.to_string()).collect();
    format!(
        "<mark class=\"{}\" data-highlights=\"{}\">{}</mark>",
        classes.join(" "),
        ids.join(" "),
        text
    )
}

/// Highlighted text followed by the legend. With a panel, the open detail
/// is rendered after the text.
pub fn render_html(rendered: &RenderedText, panel: Option<&HighlightPanel>) -> String {
    let mut out = Vec::new();
    let body: String = rendered
        .segments
        .iter()
        .map(|s| render_segment(rendered, s))
        .collect();
    out.push(format!("<div class=\"highlighted-text\">{}</div>", body));

    if let Some(d) = panel.and_then(|p| p.open_detail(rendered)) {
        let mut lines = vec![
            format!("<strong>{}</strong>", escape_html(&d.kind_label)),
            format!("<p>Confidence: {}</p>", d.confidence_pct),
        ];
        if let Some(src) = &d.source {
            lines.push(format!(
                "<p>Source: <a href=\"{0}\">{0}</a></p>",
                escape_html(src)
            ));
        }
        if let Some(reason) = &d.reason {
            lines.push(format!("<p>Reason: {}</p>", escape_html(reason)));
        }
        out.push(format!(
            "<aside class=\"highlight-detail\">{}</aside>",
            lines.join("")
        ));
    }

    out.push("<ul class=\"highlight-legend\">".to_string());
    for entry in &rendered.legend {
        out.push(format!(
            "<li><span class=\"{}\">{}</span> {}</li>",
            entry.css_class,
            escape_html(&entry.label),
            escape_html(&entry.description)
        ));
    }
    out.push("</ul>".to_string());
    out.join("\n")
}
