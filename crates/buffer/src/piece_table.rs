// Chunk: docs/chunks/piece_table - Piece table document model with dual-buffer backing

//! The piece table: position lookup, insertion, and deletion over the
//! ordered piece sequence.
//!
//! The table owns the sequence and a running document length equal to the
//! sum of all piece lengths. Concatenating the buffer ranges addressed by
//! the pieces, in sequence order, reproduces the current document text;
//! every mutation preserves that invariant or fails before touching the
//! sequence.
//!
//! Lookups pick a scan direction from the position's distance to either end
//! of the document. The sequence offers no random access, so scanning from
//! the nearer end halves the expected number of pieces traversed for the
//! common case of edits clustered near the start or end.

use tracing::trace;

use crate::error::{BufferError, Result};
use crate::piece::Piece;
use crate::piece_list::{NodeId, PieceList};
use crate::span::Span;

/// Ordered piece sequence plus the document length it reconstructs.
#[derive(Debug)]
pub struct PieceTable {
    pieces: PieceList,
    doc_len: usize,
    /// Mutation counter for sampling debug assertions (debug builds only).
    #[cfg(debug_assertions)]
    debug_mutation_count: u64,
}

impl PieceTable {
    /// Creates a table for an empty document.
    pub fn new() -> Self {
        Self {
            pieces: PieceList::new(),
            doc_len: 0,
            #[cfg(debug_assertions)]
            debug_mutation_count: 0,
        }
    }

    /// Creates a table whose document is the first `original_len` characters
    /// of the original buffer.
    pub fn with_original(original_len: usize) -> Self {
        let mut table = Self::new();
        if original_len > 0 {
            table.pieces.push_back(Piece::original(Span::new(0, original_len)));
            table.doc_len = original_len;
        }
        table
    }

    // ==================== Accessors ====================

    /// Current document length in characters.
    pub fn doc_len(&self) -> usize {
        self.doc_len
    }

    /// Number of pieces in the sequence.
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Iterates pieces in document order.
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.pieces.iter()
    }

    // ==================== Position lookup ====================

    /// Returns the piece covering `position` and that piece's starting
    /// document offset.
    ///
    /// `position` must satisfy `position < doc_len`; the document-end
    /// position is an insert-only case handled by callers, not by this
    /// primitive.
    pub fn locate_piece(&self, position: usize) -> Result<(Piece, usize)> {
        let (id, start) = self.locate_node(position)?;
        Ok((self.pieces.piece(id), start))
    }

    /// Returns, in order, every piece overlapping `span`, plus the starting
    /// document offset of the first returned piece.
    ///
    /// An empty span yields an empty list and offset 0 without traversal.
    pub fn locate_covering(&self, span: Span) -> Result<(Vec<Piece>, usize)> {
        let (ids, start) = self.covering_nodes(span)?;
        Ok((ids.iter().map(|&id| self.pieces.piece(id)).collect(), start))
    }

    fn locate_node(&self, position: usize) -> Result<(NodeId, usize)> {
        if position >= self.doc_len {
            return Err(BufferError::PositionOutOfRange {
                position,
                doc_len: self.doc_len,
            });
        }
        if position > self.doc_len / 2 {
            self.locate_backward(position)
        } else {
            self.locate_forward(position)
        }
    }

    /// Head-to-tail scan: accumulate piece lengths until the running end
    /// offset exceeds `position`.
    fn locate_forward(&self, position: usize) -> Result<(NodeId, usize)> {
        let mut start = 0;
        let mut id = self.pieces.head();
        while let Some(node) = id {
            let end = start + self.pieces.piece(node).len();
            if position < end {
                return Ok((node, start));
            }
            start = end;
            id = self.pieces.next(node);
        }
        Err(BufferError::PositionOutOfRange {
            position,
            doc_len: self.doc_len,
        })
    }

    /// Tail-to-head scan: walk backward until the running start offset
    /// drops to or below `position`.
    fn locate_backward(&self, position: usize) -> Result<(NodeId, usize)> {
        let mut end = self.doc_len;
        let mut id = self.pieces.tail();
        while let Some(node) = id {
            let start = end - self.pieces.piece(node).len();
            if start <= position {
                return Ok((node, start));
            }
            end = start;
            id = self.pieces.prev(node);
        }
        Err(BufferError::PositionOutOfRange {
            position,
            doc_len: self.doc_len,
        })
    }

    fn covering_nodes(&self, span: Span) -> Result<(Vec<NodeId>, usize)> {
        if span.is_empty() {
            return Ok((Vec::new(), 0));
        }
        if span.end() > self.doc_len {
            return Err(BufferError::SpanOutOfRange {
                span,
                doc_len: self.doc_len,
            });
        }
        if span.start > self.doc_len / 2 {
            Ok(self.covering_backward(span))
        } else {
            Ok(self.covering_forward(span))
        }
    }

    /// Head-to-tail scan: collect pieces once the running end passes
    /// `span.start`, stop once it reaches `span.end()`.
    fn covering_forward(&self, span: Span) -> (Vec<NodeId>, usize) {
        let mut out = Vec::new();
        let mut first_start = 0;
        let mut start = 0;
        let mut id = self.pieces.head();
        while let Some(node) = id {
            let end = start + self.pieces.piece(node).len();
            if end > span.start {
                if out.is_empty() {
                    first_start = start;
                }
                out.push(node);
                if end >= span.end() {
                    break;
                }
            }
            start = end;
            id = self.pieces.next(node);
        }
        (out, first_start)
    }

    /// Tail-to-head scan: count how many trailing pieces overlap the span
    /// while walking back to the first one, then collect exactly that many
    /// walking forward again.
    fn covering_backward(&self, span: Span) -> (Vec<NodeId>, usize) {
        let mut needed = 0;
        let mut start = self.doc_len;
        let mut first = self.pieces.tail();
        let mut id = self.pieces.tail();
        while let Some(node) = id {
            start -= self.pieces.piece(node).len();
            if start < span.end() {
                needed += 1;
            }
            first = Some(node);
            if start <= span.start {
                break;
            }
            id = self.pieces.prev(node);
        }

        let first_start = start;
        let mut out = Vec::with_capacity(needed);
        let mut id = first;
        while let Some(node) = id {
            if out.len() == needed {
                break;
            }
            out.push(node);
            id = self.pieces.next(node);
        }
        (out, first_start)
    }

    // ==================== Insertion ====================

    /// Splices a piece addressing `buffer_span` (a freshly appended range in
    /// the append buffer) into the document at `position`.
    ///
    /// No-op for an empty span. `position` may equal the document length,
    /// which appends without any search.
    pub fn insert(&mut self, position: usize, buffer_span: Span) -> Result<()> {
        if buffer_span.is_empty() {
            return Ok(());
        }
        if position > self.doc_len {
            return Err(BufferError::PositionOutOfRange {
                position,
                doc_len: self.doc_len,
            });
        }
        trace!(position, len = buffer_span.len, "insert piece");

        let piece = Piece::appended(buffer_span);
        if position == self.doc_len {
            // The common case for sequential typing: no search at all.
            self.pieces.push_back(piece);
        } else if position == 0 {
            self.pieces.push_front(piece);
        } else {
            // locate_node cannot fail here: 0 < position < doc_len.
            let (node, start) = self.locate_node(position)?;
            let offset = position - start;
            if offset == 0 {
                // The position sits on this piece's leading edge, which is
                // also the previous piece's trailing edge. A single splice
                // covers both boundary cases.
                self.pieces.insert_before(node, piece);
            } else {
                let (before, after) = self.pieces.piece(node).split_at(offset);
                self.pieces.replace(node, before);
                let inserted = self.pieces.insert_after(node, piece);
                self.pieces.insert_after(inserted, after);
            }
        }

        self.doc_len += buffer_span.len;
        self.assert_lengths_consistent();
        Ok(())
    }

    // ==================== Deletion ====================

    /// Removes the document range `span` from the sequence. Buffer storage
    /// is untouched; only piece bookkeeping changes.
    ///
    /// No-op for an empty span.
    pub fn delete(&mut self, span: Span) -> Result<()> {
        if span.is_empty() {
            return Ok(());
        }
        // Validates the span before any structural change.
        let (covering, first_start) = self.covering_nodes(span)?;
        trace!(start = span.start, len = span.len, pieces = covering.len(), "delete span");

        if covering.len() == 1 {
            self.delete_within_piece(covering[0], first_start, span);
        } else {
            let first = covering[0];
            let last = covering[covering.len() - 1];

            // Document offsets are taken while the covering run is intact;
            // the piece-local trims below do not depend on later shifts.
            let first_len = self.pieces.piece(first).len();
            let interior_len: usize = covering[1..covering.len() - 1]
                .iter()
                .map(|&id| self.pieces.piece(id).len())
                .sum();
            let last_start = first_start + first_len + interior_len;

            // Pieces strictly between first and last are consumed whole.
            for &id in &covering[1..covering.len() - 1] {
                self.pieces.remove(id);
            }
            self.delete_within_piece(first, first_start, span);
            self.delete_within_piece(last, last_start, span);
        }

        self.doc_len -= span.len;
        self.assert_lengths_consistent();
        Ok(())
    }

    /// Applies the part of `span` that falls within the piece at `id`,
    /// whose starting document offset is `piece_start`.
    ///
    /// Trims the leading or trailing edge when the range touches a piece
    /// boundary, removes the piece when fully consumed, and splits it when
    /// the range is strictly interior.
    fn delete_within_piece(&mut self, id: NodeId, piece_start: usize, span: Span) {
        let piece = self.pieces.piece(id);
        let piece_end = piece_start + piece.len();
        let from = span.start.max(piece_start) - piece_start;
        let to = span.end().min(piece_end) - piece_start;
        debug_assert!(from < to, "empty trim on piece at offset {}", piece_start);

        if from == 0 && to == piece.len() {
            self.pieces.remove(id);
        } else if from == 0 {
            self.pieces.replace(id, piece.trim_start(to));
        } else if to == piece.len() {
            self.pieces.replace(id, piece.trim_end(to - from));
        } else {
            let before = Piece::new(piece.kind, Span::new(piece.span.start, from));
            let after = Piece::new(
                piece.kind,
                Span::new(piece.span.start + to, piece.len() - to),
            );
            self.pieces.replace(id, before);
            self.pieces.insert_after(id, after);
        }
    }

    // ==================== Validation ====================

    /// Debug assertion: the running document length must equal the sum of
    /// piece lengths, and no zero-length piece may be in the sequence.
    /// Compiled out in release builds.
    ///
    /// Uses a mutation counter so the O(pieces) walk doesn't tank perf in
    /// tight edit loops, checking every 64th mutation.
    #[cfg(debug_assertions)]
    fn assert_lengths_consistent(&mut self) {
        self.debug_mutation_count += 1;
        if self.debug_mutation_count % 64 != 0 {
            return;
        }
        let sum: usize = self.pieces.iter().map(|p| p.len()).sum();
        debug_assert_eq!(
            sum, self.doc_len,
            "piece lengths sum to {} but document length is {}",
            sum, self.doc_len,
        );
        debug_assert!(
            self.pieces.iter().all(|p| p.len() > 0),
            "zero-length piece in sequence"
        );
    }

    #[cfg(not(debug_assertions))]
    fn assert_lengths_consistent(&mut self) {}
}

impl Default for PieceTable {
    fn default() -> Self {
        Self::new()
    }
}
