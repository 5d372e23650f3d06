//! RTF (Rich Text Format) interpreter module.
//!
//! This module turns an RTF command stream into a structured [`Document`]:
//! paragraphs of styled spans plus the font, color, list and list override
//! tables, page margins, and a document-level style hoisted from the
//! paragraphs.
//!
//! # Architecture
//!
//! - **Lexer**: Scans RTF bytes into [`Command`]s (groups, control words,
//!   text, escaped bytes)
//! - **Interpreter**: Tracks brace scopes with inherited style and charset,
//!   dispatches control words, and folds closed scopes into their parents
//! - **Document**: The interpreted result, bundled with its [`Diagnostics`]
//!   in [`RtfDocument`]
//!
//! # Example
//!
//! ```rust
//! use rtf_interpreter::rtf::RtfDocument;
//!
//! let rtf_text = r#"{\rtf1\ansi{\fonttbl\f0\fswiss Helvetica;}\f0\pard Hello World!\par}"#;
//! let doc = RtfDocument::parse(rtf_text)?;
//! assert_eq!(doc.text(), "Hello World!\n");
//! assert_eq!(doc.document().fonts().get(0).unwrap().name, "Helvetica");
//! # Ok::<(), rtf_interpreter::rtf::RtfError>(())
//! ```

mod charset;
mod command;
mod control;
mod diagnostics;
mod document;
mod error;
mod interpreter;
mod lexer;
mod list;
mod scope;
mod style;
mod types;

// Re-exports
pub use charset::Charset;
pub use command::{Command, Param};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLevel, Diagnostics};
pub use document::{Document, RtfDocument};
pub use error::{RtfError, RtfResult};
pub use interpreter::{Interpreter, InterpreterOptions};
pub use lexer::Lexer;
pub use list::{
    List, ListJustification, ListLevel, ListLevelType, ListOverride, ListOverrideTable, ListTable,
};
pub use style::{
    Alignment, BaseStyle, DEFAULT_MARGIN_HORIZONTAL, DEFAULT_MARGIN_VERTICAL, Style, StyleProperty,
    StyleValue, VerticalAlign,
};
pub use types::{Color, ColorTable, Font, FontFamily, FontTable, Paragraph, Span};
