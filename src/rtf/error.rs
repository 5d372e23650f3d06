//! Error types for RTF interpretation.
//!
//! Most problems in an RTF command stream are recoverable and are reported
//! through [`Diagnostics`](super::Diagnostics) instead. `RtfError` is only
//! returned for I/O failures, for lexer input it cannot tokenize, and for
//! conditions that strict interpretation promotes to hard failures.

use thiserror::Error;

/// Result type for RTF operations.
pub type RtfResult<T> = Result<T, RtfError>;

/// RTF interpretation errors.
#[derive(Error, Debug)]
pub enum RtfError {
    /// IO error while reading RTF input
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Lexer error during tokenization
    #[error("RTF Lexer Error: {0}")]
    LexerError(String),

    /// Malformed hex escape (`\'hh`)
    #[error("Invalid hex escape: {0}")]
    InvalidHex(String),

    /// Command kind the interpreter has no handler for
    #[error("Unknown command kind: {0}")]
    UnknownCommand(String),

    /// Group end without a matching group start
    #[error("Unbalanced group: {0}")]
    UnbalancedGroup(String),

    /// Content that violates a table destination's grammar
    #[error("Malformed table content: {0}")]
    MalformedTable(String),
}

