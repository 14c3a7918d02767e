// Chunk: docs/chunks/piece_table - Piece table document model with dual-buffer backing
// Chunk: docs/chunks/text_cache - Materialized text cache with generation invalidation

//! piece-edit-buffer: the piece table document model for the piece-edit editor.
//!
//! This crate represents the live text of an editable document without
//! rewriting the full contents on each edit. The original text is held in an
//! immutable buffer; every insertion lands in an append-only buffer; an
//! ordered sequence of pieces, each addressing a range of one of the two
//! buffers, reconstructs the current document.
//!
//! # Overview
//!
//! The main type is [`DocumentBuffer`], which provides:
//! - Character and substring reads by document position
//! - Insertion and deletion at arbitrary positions
//! - A materialized-text cache for repeated substring reads
//!
//! Edit cost tracks edit locality, not document size: position lookups scan
//! the piece sequence from whichever end is nearer, and edits at the
//! document boundaries splice without any search.
//!
//! # Example
//!
//! ```
//! use piece_edit_buffer::{DocumentBuffer, Span};
//!
//! let mut doc = DocumentBuffer::from_str("Hello!");
//! doc.insert(5, " there").unwrap();
//! assert_eq!(doc.len(), 12);
//! assert_eq!(doc.content(), "Hello there!");
//! assert_eq!(doc.text(Span::new(6, 5)).unwrap(), "there");
//!
//! doc.delete(Span::new(5, 6)).unwrap();
//! assert_eq!(doc.content(), "Hello!");
//! ```
//!
//! # Errors
//!
//! Operations referencing a position beyond `[0, len]` or a span whose end
//! exceeds the document length fail with [`BufferError`]. Nothing is
//! clamped, nothing is retried, and a failed operation leaves the document
//! unchanged.
//!
//! # Concurrency
//!
//! Single-threaded and synchronous: one logical editing session owns one
//! `DocumentBuffer`. Callers needing concurrent access must serialize
//! externally.

mod document;
mod error;
mod piece;
mod piece_list;
mod piece_table;
mod span;
mod storage;
mod text_cache;

pub use document::DocumentBuffer;
pub use error::{BufferError, Result};
pub use span::Span;
