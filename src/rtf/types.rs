//! RTF document type definitions.

use super::charset::Charset;
use super::style::Style;
use serde::Serialize;

/// RTF color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Color {
    /// Red component (0-255)
    pub red: u8,
    /// Green component (0-255)
    pub green: u8,
    /// Blue component (0-255)
    pub blue: u8,
}

impl Color {
    /// Create a new color.
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Color table containing document colors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColorTable {
    colors: Vec<Color>,
}

impl ColorTable {
    /// Create a new color table.
    #[inline]
    pub fn new() -> Self {
        Self { colors: Vec::new() }
    }

    /// Add a color to the table and return its index.
    #[inline]
    pub fn add(&mut self, color: Color) -> usize {
        self.colors.push(color);
        self.colors.len() - 1
    }

    /// Get a color by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Color> {
        self.colors.get(index)
    }

    /// Get all colors in the table.
    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Number of colors.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Font family categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Nil (unknown or default)
    #[default]
    Nil,
    /// Roman (serif) fonts
    Roman,
    /// Swiss (sans-serif) fonts
    Swiss,
    /// Modern (monospace) fonts
    Modern,
    /// Script fonts
    Script,
    /// Decorative fonts
    Decor,
    /// Technical, symbol, and mathematical fonts
    Tech,
    /// Arabic, Hebrew, or other bidirectional fonts
    Bidi,
}

impl FontFamily {
    /// Lowercase family name without the `f` prefix.
    pub const fn as_str(&self) -> &'static str {
        match self {
            FontFamily::Nil => "nil",
            FontFamily::Roman => "roman",
            FontFamily::Swiss => "swiss",
            FontFamily::Modern => "modern",
            FontFamily::Script => "script",
            FontFamily::Decor => "decor",
            FontFamily::Tech => "tech",
            FontFamily::Bidi => "bidi",
        }
    }
}

/// Font definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Font {
    /// Font number (`\fN`)
    pub id: i32,
    /// Font family category
    pub family: FontFamily,
    /// Character set
    pub charset: Charset,
    /// Font name
    pub name: String,
    /// Pitch (`\fprq`): 0 default, 1 fixed, 2 variable
    pub pitch: Option<i32>,
}

impl Font {
    /// Create an unnamed font.
    #[inline]
    pub fn new(id: i32, charset: Charset) -> Self {
        Self {
            id,
            family: FontFamily::Nil,
            charset,
            name: String::new(),
            pitch: None,
        }
    }

    /// Append a fragment of the font name.
    ///
    /// One trailing `;` terminator, and the whitespace after it, is stripped.
    pub fn push_name(&mut self, fragment: &str) {
        match fragment.trim_end().strip_suffix(';') {
            Some(name) => self.name.push_str(name),
            None => self.name.push_str(fragment),
        }
    }
}

/// Font table containing document fonts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FontTable {
    fonts: Vec<Font>,
}

impl FontTable {
    /// Create a new font table.
    #[inline]
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Add a font, replacing any earlier definition with the same number.
    pub fn insert(&mut self, font: Font) {
        match self.fonts.iter_mut().find(|f| f.id == font.id) {
            Some(existing) => *existing = font,
            None => self.fonts.push(font),
        }
    }

    /// Get a font by number.
    #[inline]
    pub fn get(&self, id: i32) -> Option<&Font> {
        self.fonts.iter().find(|f| f.id == id)
    }

    /// Get a font by number (mutable).
    #[inline]
    pub fn get_mut(&mut self, id: i32) -> Option<&mut Font> {
        self.fonts.iter_mut().find(|f| f.id == id)
    }

    /// Get all fonts in definition order.
    #[inline]
    pub fn fonts(&self) -> &[Font] {
        &self.fonts
    }

    /// Number of fonts.
    #[inline]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// A text run with formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Decoded text
    pub value: String,
    /// Style active when the text was read
    pub style: Style,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub fn new(value: impl Into<String>, style: Style) -> Self {
        Self {
            value: value.into(),
            style,
        }
    }

    /// Get the text content.
    #[inline]
    pub fn text(&self) -> &str {
        &self.value
    }
}

/// A paragraph: the spans closed by one paragraph break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    /// Style active at the paragraph break
    pub style: Style,
    /// Runs contained in this paragraph
    pub spans: Vec<Span>,
}

impl Paragraph {
    /// Create an empty paragraph.
    #[inline]
    pub fn new(style: Style) -> Self {
        Self {
            style,
            spans: Vec::new(),
        }
    }

    /// Get the text content of the paragraph.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.value.as_str()).collect()
    }

    /// Get the spans in this paragraph.
    #[inline]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }
}

/// Content item accumulated by a scope.
///
/// Inside scopes a paragraph is only a break marker; spans are attached to
/// it once it reaches the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Content {
    Span(Span),
    Paragraph(Paragraph),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_name_strips_terminator() {
        let mut font = Font::new(0, Charset::Ascii);
        font.push_name("Times New Roman;");
        assert_eq!(font.name, "Times New Roman");

        let mut font = Font::new(1, Charset::Ascii);
        font.push_name("Courier");
        font.push_name(" New; ");
        assert_eq!(font.name, "Courier New");
    }

    #[test]
    fn test_font_table_redefinition_replaces() {
        let mut table = FontTable::new();
        let mut first = Font::new(0, Charset::Ascii);
        first.name = "Arial".into();
        table.insert(first);

        let mut second = Font::new(0, Charset::Ascii);
        second.name = "Helvetica".into();
        table.insert(second);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0).unwrap().name, "Helvetica");
    }

    #[test]
    fn test_paragraph_text() {
        let style = Style::default();
        let mut para = Paragraph::new(style.clone());
        para.spans.push(Span::new("Hello ", style.clone()));
        para.spans.push(Span::new("World", style));
        assert_eq!(para.text(), "Hello World");
    }
}
