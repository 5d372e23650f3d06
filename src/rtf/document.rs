//! RTF document representation.

use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::interpreter::{Interpreter, InterpreterOptions};
use super::lexer::Lexer;
use super::list::{ListOverrideTable, ListTable};
use super::style::{BaseStyle, DEFAULT_MARGIN_HORIZONTAL, DEFAULT_MARGIN_VERTICAL};
use super::types::{ColorTable, FontTable, Paragraph};
use serde::Serialize;
use std::path::Path;

/// The interpreted document.
///
/// Paragraph styles are complete; `style` additionally holds the properties
/// shared by every paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub(crate) content: Vec<Paragraph>,
    pub(crate) style: BaseStyle,
    pub(crate) fonts: FontTable,
    pub(crate) colors: ColorTable,
    pub(crate) lists: ListTable,
    pub(crate) override_lists: ListOverrideTable,
    pub(crate) margin_left: i32,
    pub(crate) margin_right: i32,
    pub(crate) margin_top: i32,
    pub(crate) margin_bottom: i32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with default margins.
    pub(crate) fn new() -> Self {
        Self {
            content: Vec::new(),
            style: BaseStyle::default(),
            fonts: FontTable::new(),
            colors: ColorTable::new(),
            lists: ListTable::new(),
            override_lists: ListOverrideTable::new(),
            margin_left: DEFAULT_MARGIN_HORIZONTAL,
            margin_right: DEFAULT_MARGIN_HORIZONTAL,
            margin_top: DEFAULT_MARGIN_VERTICAL,
            margin_bottom: DEFAULT_MARGIN_VERTICAL,
        }
    }

    /// Get all paragraphs in document order.
    #[inline]
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.content
    }

    /// Get the number of paragraphs.
    #[inline]
    pub fn paragraph_count(&self) -> usize {
        self.content.len()
    }

    /// Properties shared by every paragraph.
    #[inline]
    pub fn style(&self) -> &BaseStyle {
        &self.style
    }

    /// Get the font table.
    #[inline]
    pub fn fonts(&self) -> &FontTable {
        &self.fonts
    }

    /// Get the color table.
    #[inline]
    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    /// Get the list table.
    #[inline]
    pub fn lists(&self) -> &ListTable {
        &self.lists
    }

    /// Get the list override table.
    #[inline]
    pub fn override_lists(&self) -> &ListOverrideTable {
        &self.override_lists
    }

    /// Left page margin in twips.
    #[inline]
    pub fn margin_left(&self) -> i32 {
        self.margin_left
    }

    /// Right page margin in twips.
    #[inline]
    pub fn margin_right(&self) -> i32 {
        self.margin_right
    }

    /// Top page margin in twips.
    #[inline]
    pub fn margin_top(&self) -> i32 {
        self.margin_top
    }

    /// Bottom page margin in twips.
    #[inline]
    pub fn margin_bottom(&self) -> i32 {
        self.margin_bottom
    }

    /// Get all text content, one line per paragraph.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for paragraph in &self.content {
            for span in &paragraph.spans {
                text.push_str(&span.value);
            }
            text.push('\n');
        }
        text
    }
}

/// RTF Document.
///
/// This is the main entry point for parsing RTF documents. It bundles the
/// interpreted [`Document`] with the [`Diagnostics`] collected on the way.
#[derive(Debug, Clone, Serialize)]
pub struct RtfDocument {
    document: Document,
    diagnostics: Diagnostics,
}

impl RtfDocument {
    pub(crate) fn new(document: Document, diagnostics: Diagnostics) -> Self {
        Self {
            document,
            diagnostics,
        }
    }

    /// Parse an RTF document from a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rtf_interpreter::rtf::RtfDocument;
    ///
    /// let rtf = r#"{\rtf1\ansi Hello World!\par}"#;
    /// let doc = RtfDocument::parse(rtf)?;
    /// assert_eq!(doc.text(), "Hello World!\n");
    /// # Ok::<(), rtf_interpreter::rtf::RtfError>(())
    /// ```
    pub fn parse(input: &str) -> RtfResult<Self> {
        Self::from_bytes(input.as_bytes())
    }

    /// Parse an RTF document from a string with explicit options.
    pub fn parse_with_options(input: &str, options: InterpreterOptions) -> RtfResult<Self> {
        Self::from_bytes_with_options(input.as_bytes(), options)
    }

    /// Parse an RTF document from a file.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use rtf_interpreter::rtf::RtfDocument;
    ///
    /// let doc = RtfDocument::open("document.rtf")?;
    /// let text = doc.text();
    /// # Ok::<(), rtf_interpreter::rtf::RtfError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> RtfResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parse an RTF document from bytes.
    pub fn from_bytes(bytes: &[u8]) -> RtfResult<Self> {
        Self::from_bytes_with_options(bytes, InterpreterOptions::default())
    }

    /// Parse an RTF document from bytes with explicit options.
    pub fn from_bytes_with_options(bytes: &[u8], options: InterpreterOptions) -> RtfResult<Self> {
        let mut interpreter = Interpreter::with_options(options);
        for command in Lexer::new(bytes) {
            interpreter.write(command?)?;
        }
        interpreter.finish()
    }

    /// Get the interpreted document.
    #[inline]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Get the diagnostics collected while interpreting.
    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Get all text content, one line per paragraph.
    #[inline]
    pub fn text(&self) -> String {
        self.document.text()
    }

    /// Split into the document and its diagnostics.
    #[inline]
    pub fn into_parts(self) -> (Document, Diagnostics) {
        (self.document, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::charset::Charset;
    use crate::rtf::diagnostics::DiagnosticKind;
    use crate::rtf::error::RtfError;
    use crate::rtf::style::Alignment;
    use crate::rtf::types::FontFamily;

    #[test]
    fn test_simple_document() {
        let rtf = r#"{\rtf1\ansi Hello World!\par}"#;
        let doc = RtfDocument::parse(rtf).unwrap();
        assert_eq!(doc.text(), "Hello World!\n");
        assert_eq!(doc.document().paragraph_count(), 1);
    }

    #[test]
    fn test_end_to_end_source() {
        let rtf = r"{\rtf1\ansi{\fonttbl{\f0\froman Times;}}\f0\b Hello\b0 World\par}";
        let doc = RtfDocument::parse(rtf).unwrap();
        let document = doc.document();

        let font = document.fonts().get(0).unwrap();
        assert_eq!(font.family, FontFamily::Roman);
        assert_eq!(font.name, "Times");
        assert_eq!(font.charset, Charset::Ascii);

        let spans = &document.paragraphs()[0].spans;
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].value.as_str(), spans[0].style.bold), ("Hello", true));
        assert_eq!((spans[1].value.as_str(), spans[1].style.bold), ("World", false));
    }

    #[test]
    fn test_word_style_document() {
        let rtf = concat!(
            r"{\rtf1\ansi\ansicpg1252\deff0\deflang1033",
            r"{\fonttbl{\f0\fswiss\fcharset0 Arial;}{\f1\fmodern\fprq1\fcharset0 Courier New;}}",
            "\r\n",
            r"{\colortbl ;\red255\green0\blue0;\red0\green0\blue255;}",
            "\r\n",
            r"{\*\generator Riched20 10.0.19041}\viewkind4\uc1 ",
            "\r\n",
            r"\pard\qc\f0\fs32\cf1 Title\par",
            "\r\n",
            r"\pard\qc\fs20\cf0 Caf\'e9 \u8364? and {\i more}\par",
            "\r\n",
            "}"
        );
        let doc = RtfDocument::parse(rtf).unwrap();
        let document = doc.document();

        assert_eq!(document.fonts().len(), 2);
        assert_eq!(document.fonts().get(1).unwrap().name, "Courier New");
        assert_eq!(document.fonts().get(1).unwrap().pitch, Some(1));
        assert_eq!(document.colors().len(), 3);
        assert_eq!(document.colors().get(2).unwrap().blue, 255);

        assert_eq!(doc.text(), "Title\nCafé € and more\n");
        let paragraphs = document.paragraphs();
        assert_eq!(paragraphs[0].spans[0].style.font_size, 32);
        assert_eq!(paragraphs[0].spans[0].style.foreground, Some(1));
        assert!(paragraphs[1].spans.last().unwrap().style.italic);
        assert_eq!(document.style().align(), Some(Alignment::Center));
    }

    #[test]
    fn test_unterminated_source() {
        let doc = RtfDocument::parse(r"{\rtf1\ansi{\b bold").unwrap();
        assert_eq!(doc.text(), "bold\n");
        assert!(doc.document().paragraphs()[0].spans[0].style.bold);
    }

    #[test]
    fn test_strict_options() {
        let rtf = r"{\rtf1 text}}";
        let lenient = RtfDocument::parse(rtf).unwrap();
        assert!(lenient.diagnostics().contains(DiagnosticKind::UnbalancedGroup));

        let options = InterpreterOptions::new().with_strict(true);
        let strict = RtfDocument::parse_with_options(rtf, options);
        assert!(matches!(strict, Err(RtfError::UnbalancedGroup(_))));
    }

    #[test]
    fn test_lexer_errors_propagate() {
        let err = RtfDocument::parse(r"{\rtf1 \'g0}").unwrap_err();
        assert!(matches!(err, RtfError::InvalidHex(_)));
    }

    #[test]
    fn test_oversized_parameter_is_not_fatal() {
        let doc = RtfDocument::parse(r"{\rtf1 \fs99999999999999999999 hi\par}").unwrap();
        assert_eq!(doc.text(), "hi\n");
        assert_eq!(doc.document().paragraphs()[0].spans[0].style.font_size, i32::MAX);
    }

    #[test]
    fn test_open_missing_file() {
        let err = RtfDocument::open("/nonexistent/document.rtf").unwrap_err();
        assert!(matches!(err, RtfError::Io(_)));
    }

    #[test]
    fn test_serialized_shape() {
        let doc = RtfDocument::parse(r"{\rtf1\ansi{\fonttbl{\f0\fnil Arial;}}\qc Hi\par}").unwrap();
        let value = serde_json::to_value(doc.document()).unwrap();

        assert_eq!(value["fonts"][0]["name"], "Arial");
        assert_eq!(value["fonts"][0]["family"], "nil");
        assert_eq!(value["fonts"][0]["charset"], "ASCII");
        assert_eq!(value["content"][0]["spans"][0]["value"], "Hi");
        assert_eq!(value["style"]["align"], "center");
        assert_eq!(value["marginLeft"], 1800);
        assert_eq!(value["marginTop"], 1440);
        assert!(value["overrideLists"].as_array().unwrap().is_empty());
    }
}
