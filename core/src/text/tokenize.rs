use crate::error::{CoreError, CoreResult};
use crate::text::index::TextIndex;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SENTENCE_TERMINATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// A whitespace-delimited word with char offsets into the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// A sentence fragment, trimmed, terminator excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

pub fn words(text: &str) -> Vec<Word> {
    let mut out = Vec::new();
    let mut current: Option<(usize, String)> = None;
    let mut pos = 0usize;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if let Some((start, w)) = current.take() {
                out.push(Word {
                    index: out.len(),
                    start,
                    end: pos,
                    text: w,
                });
            }
        } else {
            match current.as_mut() {
                Some((_, w)) => w.push(ch),
                None => current = Some((pos, ch.to_string())),
            }
        }
        pos += 1;
    }
    if let Some((start, w)) = current {
        out.push(Word {
            index: out.len(),
            start,
            end: pos,
            text: w,
        });
    }
    out
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Splits on runs of `.`, `!` and `?`, discarding fragments that are empty after trimming.
pub fn sentences(text: &str) -> CoreResult<Vec<Sentence>> {
    let idx = TextIndex::new(text);

    let mut out = Vec::new();
    let mut fragment_start = 0usize;
    let mut bounds: Vec<(usize, usize)> = SENTENCE_TERMINATORS
        .find_iter(text)
        .map(|m| {
            let b = (fragment_start, m.start());
            fragment_start = m.end();
            b
        })
        .collect();
    bounds.push((fragment_start, text.len()));

    for (s, e) in bounds {
        let raw = &text[s..e];
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lead = raw.len() - raw.trim_start().len();
        let byte_start = s + lead;
        let byte_end = byte_start + trimmed.len();
        let (Some(start), Some(end)) = (idx.char_offset(byte_start), idx.char_offset(byte_end))
        else {
            return Err(CoreError::InvalidInput(
                "sentence boundary is not on a char boundary".to_string(),
            ));
        };
        out.push(Sentence {
            index: out.len(),
            start,
            end,
            text: trimmed.to_string(),
        });
    }
    Ok(out)
}

/// Char ranges of every sentence, indexed by `sentence_index`.
pub fn sentence_ranges(text: &str) -> CoreResult<Vec<(usize, usize)>> {
    Ok(sentences(text)?.into_iter().map(|s| (s.start, s.end)).collect())
}
