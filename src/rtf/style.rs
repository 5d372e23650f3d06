//! Character and paragraph style.
//!
//! Every scope, span and paragraph carries a complete [`Style`] snapshot.
//! The document additionally exposes a sparse [`BaseStyle`]: the properties
//! that every top-level paragraph agrees on, hoisted at finalization.

use serde::Serialize;
use std::collections::BTreeMap;

/// Default left/right page margin (in twips).
pub const DEFAULT_MARGIN_HORIZONTAL: i32 = 1800;

/// Default top/bottom page margin (in twips).
pub const DEFAULT_MARGIN_VERTICAL: i32 = 1440;

/// Text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left-aligned
    #[default]
    Left,
    /// Centered
    Center,
    /// Right-aligned
    Right,
    /// Justified
    Justify,
}

impl Alignment {
    /// Lowercase name as used in the serialized model.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

/// Vertical position of text relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    /// On the baseline
    #[default]
    Normal,
    /// Superscript
    Super,
    /// Subscript
    Sub,
}

/// Resolved character and paragraph formatting.
///
/// The [`Default`] value is the document's base style, which `\pard` and
/// `\plain` reset to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Font table index
    pub font: i32,
    /// Font size in half-points
    pub font_size: i32,
    /// Bold
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Underline
    pub underline: bool,
    /// Strikethrough
    pub strikethrough: bool,
    /// Foreground color table index
    pub foreground: Option<i32>,
    /// Background color table index
    pub background: Option<i32>,
    /// First line indent (in twips)
    pub first_line_indent: i32,
    /// Left indent (in twips)
    pub indent: i32,
    /// Right indent (in twips)
    pub right_indent: i32,
    /// Space before paragraph (in twips)
    pub space_before: i32,
    /// Space after paragraph (in twips)
    pub space_after: i32,
    /// Paragraph alignment
    pub align: Alignment,
    /// Superscript/subscript
    pub valign: VerticalAlign,
    /// List override index (`\ls`)
    pub list_override: Option<i32>,
    /// List level (`\ilvl`)
    pub list_level: Option<i32>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font: 0,
            font_size: 24,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            foreground: None,
            background: None,
            first_line_indent: 0,
            indent: 0,
            right_indent: 0,
            space_before: 0,
            space_after: 0,
            align: Alignment::Left,
            valign: VerticalAlign::Normal,
            list_override: None,
            list_level: None,
        }
    }
}

/// Name of a single style property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleProperty {
    Font,
    FontSize,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Foreground,
    Background,
    FirstLineIndent,
    Indent,
    RightIndent,
    SpaceBefore,
    SpaceAfter,
    Align,
    Valign,
    ListOverride,
    ListLevel,
}

impl StyleProperty {
    /// Every property, in declaration order.
    pub const ALL: [StyleProperty; 17] = [
        StyleProperty::Font,
        StyleProperty::FontSize,
        StyleProperty::Bold,
        StyleProperty::Italic,
        StyleProperty::Underline,
        StyleProperty::Strikethrough,
        StyleProperty::Foreground,
        StyleProperty::Background,
        StyleProperty::FirstLineIndent,
        StyleProperty::Indent,
        StyleProperty::RightIndent,
        StyleProperty::SpaceBefore,
        StyleProperty::SpaceAfter,
        StyleProperty::Align,
        StyleProperty::Valign,
        StyleProperty::ListOverride,
        StyleProperty::ListLevel,
    ];
}

/// Value of a single style property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum StyleValue {
    Bool(bool),
    Int(i32),
    Align(Alignment),
    VerticalAlign(VerticalAlign),
}

impl Style {
    /// Look up one property. Unset optional properties return `None`.
    pub fn get(&self, property: StyleProperty) -> Option<StyleValue> {
        use StyleValue::{Bool, Int};

        match property {
            StyleProperty::Font => Some(Int(self.font)),
            StyleProperty::FontSize => Some(Int(self.font_size)),
            StyleProperty::Bold => Some(Bool(self.bold)),
            StyleProperty::Italic => Some(Bool(self.italic)),
            StyleProperty::Underline => Some(Bool(self.underline)),
            StyleProperty::Strikethrough => Some(Bool(self.strikethrough)),
            StyleProperty::Foreground => self.foreground.map(Int),
            StyleProperty::Background => self.background.map(Int),
            StyleProperty::FirstLineIndent => Some(Int(self.first_line_indent)),
            StyleProperty::Indent => Some(Int(self.indent)),
            StyleProperty::RightIndent => Some(Int(self.right_indent)),
            StyleProperty::SpaceBefore => Some(Int(self.space_before)),
            StyleProperty::SpaceAfter => Some(Int(self.space_after)),
            StyleProperty::Align => Some(StyleValue::Align(self.align)),
            StyleProperty::Valign => Some(StyleValue::VerticalAlign(self.valign)),
            StyleProperty::ListOverride => self.list_override.map(Int),
            StyleProperty::ListLevel => self.list_level.map(Int),
        }
    }

    /// Reset the character formatting subset (`\plain`) to `defaults`.
    ///
    /// Only font size, bold, italic and underline are touched.
    pub fn reset_character(&mut self, defaults: &Style) {
        self.font_size = defaults.font_size;
        self.bold = defaults.bold;
        self.italic = defaults.italic;
        self.underline = defaults.underline;
    }
}

/// Sparse property map hoisted onto the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BaseStyle {
    properties: BTreeMap<StyleProperty, StyleValue>,
}

impl BaseStyle {
    /// Hoist every property on which all `styles` agree.
    ///
    /// An empty input hoists nothing.
    pub fn common<'a, I>(styles: I) -> Self
    where
        I: IntoIterator<Item = &'a Style>,
        I::IntoIter: Clone,
    {
        let styles = styles.into_iter();
        let mut properties = BTreeMap::new();
        let Some(first) = styles.clone().next() else {
            return Self { properties };
        };

        for property in StyleProperty::ALL {
            let Some(value) = first.get(property) else {
                continue;
            };
            if styles.clone().all(|s| s.get(property) == Some(value)) {
                properties.insert(property, value);
            }
        }

        Self { properties }
    }

    /// Hoisted value of a property.
    #[inline]
    pub fn get(&self, property: StyleProperty) -> Option<StyleValue> {
        self.properties.get(&property).copied()
    }

    /// Hoisted alignment, if every paragraph shares one.
    pub fn align(&self) -> Option<Alignment> {
        match self.get(StyleProperty::Align) {
            Some(StyleValue::Align(align)) => Some(align),
            _ => None,
        }
    }

    /// Iterate over hoisted properties.
    pub fn iter(&self) -> impl Iterator<Item = (StyleProperty, StyleValue)> + '_ {
        self.properties.iter().map(|(k, v)| (*k, *v))
    }

    /// Number of hoisted properties.
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether nothing was hoisted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
