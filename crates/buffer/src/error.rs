// Chunk: docs/chunks/piece_table - Piece table document model with dual-buffer backing

//! Error types for document buffer operations.

use thiserror::Error;

use crate::span::Span;

/// Errors raised by the document buffer and piece table.
///
/// Out-of-range is the only error category the core raises. It is always a
/// caller error, never a transient condition; nothing is retried and nothing
/// is silently clamped. Internal invariant violations (zero-length pieces,
/// length drift) are programming errors guarded by debug assertions instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// A position beyond `[0, document length]` was referenced.
    #[error("position {position} is out of range for document of length {doc_len}")]
    PositionOutOfRange { position: usize, doc_len: usize },

    /// A span whose end exceeds the document length was referenced.
    #[error("span {span} extends past document of length {doc_len}")]
    SpanOutOfRange { span: Span, doc_len: usize },
}

pub type Result<T> = std::result::Result<T, BufferError>;
