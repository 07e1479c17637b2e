//! Character-offset view over a UTF-8 string.
//!
//! Highlight offsets count Unicode scalar values, not bytes, so a highlight
//! produced for one text can be sliced safely regardless of encoding width.

pub struct TextIndex<'a> {
    text: &'a str,
    // byte position of every char, plus text.len() as a sentinel
    byte_at: Vec<usize>,
}

impl<'a> TextIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut byte_at: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        byte_at.push(text.len());
        Self { text, byte_at }
    }

    pub fn len_chars(&self) -> usize {
        self.byte_at.len() - 1
    }

    /// Byte offset for a char offset, `None` past the end.
    pub fn byte_offset(&self, char_offset: usize) -> Option<usize> {
        self.byte_at.get(char_offset).copied()
    }

    /// Char offset for a byte offset on a char boundary.
    pub fn char_offset(&self, byte_offset: usize) -> Option<usize> {
        self.byte_at.binary_search(&byte_offset).ok()
    }

    /// Slice by char offsets. Returns `None` when the range is inverted or out of bounds.
    pub fn slice(&self, start: usize, end: usize) -> Option<&'a str> {
        if start > end {
            return None;
        }
        let s = self.byte_offset(start)?;
        let e = self.byte_offset(end)?;
        Some(&self.text[s..e])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_multibyte_text_by_chars() {
        let idx = TextIndex::new("héllo wörld");
        assert_eq!(idx.len_chars(), 11);
        assert_eq!(idx.slice(0, 5), Some("héllo"));
        assert_eq!(idx.slice(6, 11), Some("wörld"));
        assert_eq!(idx.slice(6, 12), None);
        assert_eq!(idx.slice(4, 2), None);
    }

    #[test]
    fn maps_bytes_back_to_chars() {
        let idx = TextIndex::new("aé b");
        assert_eq!(idx.char_offset(0), Some(0));
        assert_eq!(idx.char_offset(1), Some(1));
        assert_eq!(idx.char_offset(2), None);
        assert_eq!(idx.char_offset(3), Some(2));
        assert_eq!(idx.char_offset(5), Some(4));
    }
}
