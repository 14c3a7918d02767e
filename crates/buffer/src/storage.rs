// Chunk: docs/chunks/piece_table - Piece table document model with dual-buffer backing

//! Backing character storage for the document.
//!
//! Two stores exist per document: the original buffer, fixed at construction,
//! and the append buffer, which only ever grows at its end. Pieces address
//! ranges of these stores; because the append buffer never shrinks or moves
//! existing content, a span issued by `append` stays valid for the life of
//! the document, even after the text it covers is deleted from the document
//! view.
//!
//! Both stores index in character units. Encoding concerns stay outside the
//! document model.

use crate::span::Span;

const INITIAL_APPEND_CAPACITY: usize = 64;

/// The immutable text supplied when the document was opened.
#[derive(Debug)]
pub struct OriginalBuffer {
    chars: Vec<char>,
}

impl OriginalBuffer {
    /// Creates the buffer from the document's initial content.
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    /// Number of characters in the buffer.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Returns the character at `index`.
    ///
    /// `index` must be in bounds; pieces only ever address live ranges.
    pub fn char_at(&self, index: usize) -> char {
        self.chars[index]
    }

    /// Appends the characters covered by `span` to `out`.
    pub fn read_into(&self, span: Span, out: &mut String) {
        debug_assert!(span.end() <= self.chars.len(), "span {} out of buffer bounds", span);
        out.extend(&self.chars[span.start..span.end()]);
    }

    /// Returns the characters covered by `span` as a `String`.
    pub fn read(&self, span: Span) -> String {
        let mut out = String::with_capacity(span.len);
        self.read_into(span, &mut out);
        out
    }
}

/// The append-only buffer holding all text ever inserted during editing.
///
/// Deleted text is never removed; only piece bookkeeping changes on delete.
/// This keeps every previously issued span valid and leaves the door open
/// for an undo log built from piece table deltas.
#[derive(Debug)]
pub struct AppendBuffer {
    chars: Vec<char>,
}

impl AppendBuffer {
    /// Creates an empty append buffer.
    pub fn new() -> Self {
        Self {
            chars: Vec::with_capacity(INITIAL_APPEND_CAPACITY),
        }
    }

    /// Number of characters written so far.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Writes `text` at the buffer's end and returns the span of the newly
    /// written range.
    pub fn append(&mut self, text: &str) -> Span {
        let start = self.chars.len();
        self.chars.extend(text.chars());
        Span::new(start, self.chars.len() - start)
    }

    /// Returns the character at `index`.
    ///
    /// `index` must be in bounds; pieces only ever address live ranges.
    pub fn char_at(&self, index: usize) -> char {
        self.chars[index]
    }

    /// Appends the characters covered by `span` to `out`.
    pub fn read_into(&self, span: Span, out: &mut String) {
        debug_assert!(span.end() <= self.chars.len(), "span {} out of buffer bounds", span);
        out.extend(&self.chars[span.start..span.end()]);
    }

    /// Returns the characters covered by `span` as a `String`.
    pub fn read(&self, span: Span) -> String {
        let mut out = String::with_capacity(span.len);
        self.read_into(span, &mut out);
        out
    }
}

impl Default for AppendBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_read() {
        let buf = OriginalBuffer::new("hello world");
        assert_eq!(buf.len(), 11);
        assert_eq!(buf.char_at(0), 'h');
        assert_eq!(buf.char_at(10), 'd');
        assert_eq!(buf.read(Span::new(6, 5)), "world");
    }

    #[test]
    fn test_original_empty() {
        let buf = OriginalBuffer::new("");
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.read(Span::new(0, 0)), "");
    }

    #[test]
    fn test_append_returns_span_of_written_range() {
        let mut buf = AppendBuffer::new();
        let a = buf.append("abc");
        let b = buf.append("de");
        assert_eq!(a, Span::new(0, 3));
        assert_eq!(b, Span::new(3, 2));
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.read(a), "abc");
        assert_eq!(buf.read(b), "de");
    }

    #[test]
    fn test_append_empty_text() {
        let mut buf = AppendBuffer::new();
        buf.append("abc");
        let span = buf.append("");
        assert_eq!(span, Span::new(3, 0));
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_spans_survive_later_appends() {
        let mut buf = AppendBuffer::new();
        let first = buf.append("one");
        buf.append("two");
        buf.append("three");
        assert_eq!(buf.read(first), "one");
    }

    #[test]
    fn test_char_units_not_bytes() {
        let mut buf = AppendBuffer::new();
        let span = buf.append("héllo");
        assert_eq!(span.len, 5);
        assert_eq!(buf.char_at(1), 'é');
        assert_eq!(buf.read(Span::new(1, 2)), "él");
    }

    #[test]
    fn test_read_into_accumulates() {
        let mut buf = AppendBuffer::new();
        let a = buf.append("foo");
        let b = buf.append("bar");
        let mut out = String::new();
        buf.read_into(a, &mut out);
        buf.read_into(b, &mut out);
        assert_eq!(out, "foobar");
    }
}
