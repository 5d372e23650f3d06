//! Out-of-band diagnostics produced while interpreting a command stream.
//!
//! The interpreter never stops for a recoverable problem. It records a
//! [`Diagnostic`] on one of two channels and carries on:
//!
//! - **debug**: harmless oddities such as unrecognized control words or
//!   group-close traces
//! - **error**: unsupported codepages and charsets, unknown command kinds,
//!   unbalanced braces, malformed table content
//!
//! Every diagnostic is also mirrored to the `log` facade (`debug!` for the
//! debug channel, `warn!` for the error channel), so callers that only care
//! about logs do not need to inspect the list.

use serde::Serialize;
use std::fmt;

/// Diagnostic channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Harmless, informational
    Debug,
    /// Recoverable problem with the input
    Error,
}

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Control word outside the interpreted set
    UnknownControlWord,
    /// A scope was closed (trace only)
    GroupClosed,
    /// Group end with no open group
    UnbalancedGroup,
    /// Command kind the interpreter does not understand
    UnknownCommand,
    /// `\ansicpg` value outside the allow-list
    UnsupportedCodepage,
    /// `\fcharset` value without a known encoding
    UnsupportedCharset,
    /// Content that violates a table destination's grammar
    MalformedTable,
    /// Content or records dropped because nothing can hold them
    DiscardedContent,
}

/// A single diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Channel
    pub level: DiagnosticLevel,
    /// Category
    pub kind: DiagnosticKind,
    /// Human-readable detail
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DiagnosticLevel::Debug => "debug",
            DiagnosticLevel::Error => "error",
        };
        write!(f, "[{}] {:?}: {}", level, self.kind, self.message)
    }
}

/// Ordered list of diagnostics collected during interpretation.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty list.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a debug-channel diagnostic.
    pub(crate) fn debug(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{:?}: {}", kind, message);
        self.entries.push(Diagnostic {
            level: DiagnosticLevel::Debug,
            kind,
            message,
        });
    }

    /// Record an error-channel diagnostic.
    pub(crate) fn error(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{:?}: {}", kind, message);
        self.entries.push(Diagnostic {
            level: DiagnosticLevel::Error,
            kind,
            message,
        });
    }

    /// All diagnostics, in the order they were raised.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Diagnostics on the error channel.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Error)
    }

    /// Whether any error-channel diagnostic was raised.
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Whether a diagnostic of the given kind was raised.
    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    /// Number of diagnostics.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the list.
    #[inline]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
