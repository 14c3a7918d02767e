// Chunk: docs/chunks/piece_table - Piece table document model with dual-buffer backing

//! DocumentBuffer is the main public API for document editing operations.
//!
//! It composes the two backing buffers, the piece table, and the text cache.
//! Edits append new content to the append buffer and delegate positional
//! bookkeeping to the piece table; reads resolve a document position to a
//! piece, then to whichever buffer the piece addresses.
//!
//! Positions and spans are zero-based, half-open, and measured in document
//! character units throughout. Out-of-range positions and spans fail with a
//! [`BufferError`]; nothing is clamped.

use std::fmt;

use tracing::debug;

use crate::error::{BufferError, Result};
use crate::piece::BufferKind;
use crate::piece_table::PieceTable;
use crate::span::Span;
use crate::storage::{AppendBuffer, OriginalBuffer};
use crate::text_cache::TextCache;

/// An editable document over an immutable original text.
///
/// The original buffer is fixed at construction; all inserted text lands in
/// an append-only buffer that never shrinks, even when the text is later
/// deleted from the document. The piece table maps document positions onto
/// ranges of the two buffers.
///
/// Exclusive single-writer access is assumed: there is no internal locking,
/// and callers needing concurrent access must serialize externally.
#[derive(Debug)]
pub struct DocumentBuffer {
    original: OriginalBuffer,
    append: AppendBuffer,
    table: PieceTable,
    cache: TextCache,
}

impl DocumentBuffer {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self {
            original: OriginalBuffer::new(""),
            append: AppendBuffer::new(),
            table: PieceTable::new(),
            cache: TextCache::new(),
        }
    }

    /// Creates a document whose initial content is `content`.
    ///
    /// Note: `FromStr` is not implemented because it requires returning
    /// `Result`, and building a document from a string cannot fail.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Self {
        let original = OriginalBuffer::new(content);
        let table = PieceTable::with_original(original.len());
        Self {
            original,
            append: AppendBuffer::new(),
            table,
            cache: TextCache::new(),
        }
    }

    // ==================== Accessors ====================

    /// Current document length in characters.
    pub fn len(&self) -> usize {
        self.table.doc_len()
    }

    /// Returns true if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of pieces backing the document. Diagnostic; the count changes
    /// as edits split and remove pieces.
    pub fn piece_count(&self) -> usize {
        self.table.piece_count()
    }

    /// Returns the character at `position`.
    pub fn char_at(&self, position: usize) -> Result<char> {
        let (piece, piece_start) = self.table.locate_piece(position)?;
        let index = piece.span.start + (position - piece_start);
        Ok(match piece.kind {
            BufferKind::Original => self.original.char_at(index),
            BufferKind::Appended => self.append.char_at(index),
        })
    }

    /// Returns the document text covered by `span`.
    ///
    /// An empty span yields an empty string without touching the cache.
    /// Otherwise the cache is consulted for an exact-span hit before the
    /// covering pieces are walked; the rebuilt string is cached keyed by the
    /// requested span.
    pub fn text(&mut self, span: Span) -> Result<String> {
        if span.is_empty() {
            return Ok(String::new());
        }
        if let Some(hit) = self.cache.get(span) {
            return Ok(hit.to_string());
        }

        let (pieces, first_start) = self.table.locate_covering(span)?;
        let mut out = String::with_capacity(span.len);
        let mut piece_start = first_start;
        for piece in pieces {
            let piece_end = piece_start + piece.len();
            // Trim the first and last piece's extents to the span bounds.
            let from = span.start.max(piece_start) - piece_start;
            let to = span.end().min(piece_end) - piece_start;
            let buffer_span = Span::new(piece.span.start + from, to - from);
            match piece.kind {
                BufferKind::Original => self.original.read_into(buffer_span, &mut out),
                BufferKind::Appended => self.append.read_into(buffer_span, &mut out),
            }
            piece_start = piece_end;
        }

        self.cache.insert(span, out.clone());
        Ok(out)
    }

    /// Returns the entire document content as a `String`.
    pub fn content(&self) -> String {
        let mut out = String::with_capacity(self.len());
        for piece in self.table.pieces() {
            match piece.kind {
                BufferKind::Original => self.original.read_into(piece.span, &mut out),
                BufferKind::Appended => self.append.read_into(piece.span, &mut out),
            }
        }
        out
    }

    // ==================== Mutations ====================

    /// Inserts `text` at `position`. No-op for empty text.
    ///
    /// `position` may equal the document length, which appends. Any other
    /// insertion invalidates previously cached spans.
    pub fn insert(&mut self, position: usize, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        if position > self.len() {
            return Err(BufferError::PositionOutOfRange {
                position,
                doc_len: self.len(),
            });
        }
        if position != self.len() {
            self.cache.invalidate();
        }

        let buffer_span = self.append.append(text);
        debug!(position, len = buffer_span.len, "insert");
        self.table.insert(position, buffer_span)
    }

    /// Inserts a single character at `position`.
    pub fn insert_char(&mut self, position: usize, ch: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.insert(position, ch.encode_utf8(&mut buf))
    }

    /// Deletes the document range `span`. No-op for an empty span.
    ///
    /// The deleted text stays in the append buffer (or original buffer)
    /// untouched; only piece bookkeeping changes. Every delete invalidates
    /// cached spans, including ones outside the deleted range, because
    /// piece boundaries may have shifted.
    pub fn delete(&mut self, span: Span) -> Result<()> {
        self.table.delete(span)?;
        debug!(start = span.start, len = span.len, "delete");
        self.cache.invalidate();
        Ok(())
    }
}

impl Default for DocumentBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content())
    }
}
