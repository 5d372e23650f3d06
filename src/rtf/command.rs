//! The command stream consumed by the interpreter.
//!
//! A producer (for example [`Lexer`](super::Lexer)) scans RTF source left to
//! right and emits one [`Command`] per syntactic unit. Braces need not be
//! balanced; the interpreter recovers at end of stream.

use std::borrow::Cow;

/// Control word parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param<'a> {
    /// Numeric parameter (`\fs24`, `\u-3784`)
    Int(i32),
    /// String parameter (`\leveltext`, `\levelnumbers`)
    Str(Cow<'a, str>),
}

impl<'a> Param<'a> {
    /// Numeric value. String parameters are parsed when they hold an integer.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Param::Int(value) => Some(*value),
            Param::Str(text) => text.trim().parse().ok(),
        }
    }

    /// Textual value. Numeric parameters are formatted in decimal.
    pub fn to_text(&self) -> String {
        match self {
            Param::Int(value) => value.to_string(),
            Param::Str(text) => text.to_string(),
        }
    }
}

impl From<i32> for Param<'_> {
    fn from(value: i32) -> Self {
        Param::Int(value)
    }
}

impl<'a> From<&'a str> for Param<'a> {
    fn from(value: &'a str) -> Self {
        Param::Str(Cow::Borrowed(value))
    }
}

/// One unit of the RTF command stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// `{`
    GroupStart,
    /// `}`
    GroupEnd,
    /// Control word with optional parameter
    Control {
        /// Keyword without the leading backslash
        word: Cow<'a, str>,
        /// Optional parameter
        param: Option<Param<'a>>,
    },
    /// Literal text run
    Text(Cow<'a, str>),
    /// One hex-escaped byte (`\'hh`)
    HexByte(u8),
    /// Ignorable destination mark (`\*`)
    Ignorable,
    /// Paragraph end produced by the scanner (escaped line break)
    EndParagraph,
    /// Producer-specific command kind the interpreter does not understand
    Unknown(Cow<'a, str>),
}

impl<'a> Command<'a> {
    /// Control word without a parameter.
    #[inline]
    pub fn word(word: &'a str) -> Self {
        Command::Control {
            word: Cow::Borrowed(word),
            param: None,
        }
    }

    /// Control word with a parameter.
    #[inline]
    pub fn word_with(word: &'a str, param: impl Into<Param<'a>>) -> Self {
        Command::Control {
            word: Cow::Borrowed(word),
            param: Some(param.into()),
        }
    }

    /// Literal text run.
    #[inline]
    pub fn text(text: &'a str) -> Self {
        Command::Text(Cow::Borrowed(text))
    }

    /// Short name of the command kind, for diagnostics.
    pub fn kind_name(&self) -> &str {
        match self {
            Command::GroupStart => "group-start",
            Command::GroupEnd => "group-end",
            Command::Control { .. } => "control",
            Command::Text(_) => "text",
            Command::HexByte(_) => "hexchar",
            Command::Ignorable => "ignorable",
            Command::EndParagraph => "end-paragraph",
            Command::Unknown(kind) => kind,
        }
    }

    /// Detach from the source lifetime.
    pub fn into_owned(self) -> Command<'static> {
        match self {
            Command::GroupStart => Command::GroupStart,
            Command::GroupEnd => Command::GroupEnd,
            Command::Control { word, param } => Command::Control {
                word: Cow::Owned(word.into_owned()),
                param: param.map(|p| match p {
                    Param::Int(value) => Param::Int(value),
                    Param::Str(text) => Param::Str(Cow::Owned(text.into_owned())),
                }),
            },
            Command::Text(text) => Command::Text(Cow::Owned(text.into_owned())),
            Command::HexByte(byte) => Command::HexByte(byte),
            Command::Ignorable => Command::Ignorable,
            Command::EndParagraph => Command::EndParagraph,
            Command::Unknown(kind) => Command::Unknown(Cow::Owned(kind.into_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_conversions() {
        assert_eq!(Param::Int(12).as_int(), Some(12));
        assert_eq!(Param::from(" -7 ").as_int(), Some(-7));
        assert_eq!(Param::from("abc").as_int(), None);
        assert_eq!(Param::Int(3).to_text(), "3");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Command::word("par").kind_name(), "control");
        assert_eq!(Command::HexByte(0x41).kind_name(), "hexchar");
        assert_eq!(Command::Unknown(Cow::Borrowed("bin")).kind_name(), "bin");
    }
}
