//! rtf-interpreter - A Rust library for interpreting Rich Text Format documents
//!
//! This library turns RTF source into a structured document model: styled
//! paragraphs, font and color tables, list definitions, page margins, and the
//! diagnostics collected along the way.
//!
//! # Features
//!
//! - **Streaming interpreter**: Consumes one command at a time; the lexer is
//!   just one possible producer
//! - **Style cascade**: Nested groups inherit and override character and
//!   paragraph formatting
//! - **Charsets**: `\ansicpg` codepages, `\fcharset` font charsets, hex
//!   escapes and `\u` escapes including surrogate pairs
//! - **Tables**: Fonts, colors, lists and list overrides
//! - **Recovery**: Unbalanced braces and unknown keywords never abort
//!   interpretation unless strict mode is requested
//!
//! # Example - Parsing an RTF string
//!
//! ```
//! use rtf_interpreter::RtfDocument;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = RtfDocument::parse(r"{\rtf1\ansi{\b Bold} and plain\par}")?;
//!
//! for paragraph in doc.document().paragraphs() {
//!     for span in paragraph.spans() {
//!         println!("{:?} bold={}", span.text(), span.style.bold);
//!     }
//! }
//! assert_eq!(doc.text(), "Bold and plain\n");
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Driving the interpreter directly
//!
//! ```
//! use rtf_interpreter::rtf::{Command, Interpreter, InterpreterOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut interpreter = Interpreter::with_options(InterpreterOptions::new().with_strict(true));
//! interpreter.write(Command::GroupStart)?;
//! interpreter.write(Command::word_with("rtf", 1))?;
//! interpreter.write(Command::word_with("u", -3784))?;
//! interpreter.write(Command::GroupEnd)?;
//!
//! let doc = interpreter.finish()?;
//! assert_eq!(doc.text(), "\u{F138}\n");
//! # Ok(())
//! # }
//! ```

pub mod common;

/// RTF command stream interpretation
pub mod rtf;

pub use rtf::{Document, RtfDocument, RtfError, RtfResult};
