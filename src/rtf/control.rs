//! Control word dispatch table.
//!
//! Every interpreted keyword maps to a [`ControlWord`] handler tag through a
//! compile-time perfect hash. Keywords missing from the table are ignored by
//! the interpreter.

use super::charset::Charset;
use super::style::{Alignment, VerticalAlign};
use super::types::FontFamily;
use phf::{Map, phf_map};

/// Page margin edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Margin {
    Left,
    Right,
    Top,
    Bottom,
}

/// Handler tag for an interpreted control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlWord {
    // Document structure and charsets
    Rtf,
    Charset(Charset),
    AnsiCodePage,
    DefaultFont,
    Destination,

    // Font table
    FontTable,
    Font,
    FontFamily(FontFamily),
    FontCharset,
    FontPitch,

    // Color table
    ColorTable,
    Red,
    Green,
    Blue,

    // List table
    ListTable,
    List,
    ListLevel,
    ListId,
    ListTemplateId,
    ListSimple,
    ListHybrid,
    LevelStartAt,
    LevelNfc,
    LevelNfcn,
    LevelJc,
    LevelJcn,
    LevelFollow,
    LevelText,
    LevelNumbers,
    LevelIndent,
    LevelSpace,

    // List override table
    ListOverrideTable,
    ListOverride,
    ListOverrideCount,
    ListOverrideIndex,
    ListLevelIndex,

    // Character formatting
    Bold,
    Italic,
    Underline,
    UnderlineNone,
    Strike,
    VerticalAlign(VerticalAlign),
    FontSize,
    Foreground,
    Background,
    Plain,

    // Paragraph formatting
    Pard,
    Par,
    Align(Alignment),
    Indent,
    RightIndent,
    FirstLineIndent,
    SpaceBefore,
    SpaceAfter,

    // Text
    Symbol(&'static str),
    Unicode,

    // Document layout
    Margin(Margin),
}

static CONTROL_WORDS: Map<&'static str, ControlWord> = phf_map! {
    // Document
    "rtf" => ControlWord::Rtf,
    "ansi" => ControlWord::Charset(Charset::Ascii),
    "mac" => ControlWord::Charset(Charset::MacRoman),
    "pc" => ControlWord::Charset(Charset::CodePage(437)),
    "pca" => ControlWord::Charset(Charset::CodePage(850)),
    "ansicpg" => ControlWord::AnsiCodePage,
    "deff" => ControlWord::DefaultFont,

    // Destinations whose text is not body content
    "info" => ControlWord::Destination,
    "stylesheet" => ControlWord::Destination,
    "pict" => ControlWord::Destination,
    "object" => ControlWord::Destination,
    "header" => ControlWord::Destination,
    "footer" => ControlWord::Destination,
    "footnote" => ControlWord::Destination,

    // Fonts
    "fonttbl" => ControlWord::FontTable,
    "f" => ControlWord::Font,
    "fnil" => ControlWord::FontFamily(FontFamily::Nil),
    "froman" => ControlWord::FontFamily(FontFamily::Roman),
    "fswiss" => ControlWord::FontFamily(FontFamily::Swiss),
    "fmodern" => ControlWord::FontFamily(FontFamily::Modern),
    "fscript" => ControlWord::FontFamily(FontFamily::Script),
    "fdecor" => ControlWord::FontFamily(FontFamily::Decor),
    "ftech" => ControlWord::FontFamily(FontFamily::Tech),
    "fbidi" => ControlWord::FontFamily(FontFamily::Bidi),
    "fcharset" => ControlWord::FontCharset,
    "fprq" => ControlWord::FontPitch,

    // Colors
    "colortbl" => ControlWord::ColorTable,
    "red" => ControlWord::Red,
    "green" => ControlWord::Green,
    "blue" => ControlWord::Blue,

    // Lists
    "listtable" => ControlWord::ListTable,
    "list" => ControlWord::List,
    "listlevel" => ControlWord::ListLevel,
    "listid" => ControlWord::ListId,
    "listtemplateid" => ControlWord::ListTemplateId,
    "listsimple" => ControlWord::ListSimple,
    "listhybrid" => ControlWord::ListHybrid,
    "levelstartat" => ControlWord::LevelStartAt,
    "levelnfc" => ControlWord::LevelNfc,
    "levelnfcn" => ControlWord::LevelNfcn,
    "leveljc" => ControlWord::LevelJc,
    "leveljcn" => ControlWord::LevelJcn,
    "levelfollow" => ControlWord::LevelFollow,
    "leveltext" => ControlWord::LevelText,
    "levelnumbers" => ControlWord::LevelNumbers,
    "levelindent" => ControlWord::LevelIndent,
    "levelspace" => ControlWord::LevelSpace,
    "listoverridetable" => ControlWord::ListOverrideTable,
    "listoverride" => ControlWord::ListOverride,
    "listoverridecount" => ControlWord::ListOverrideCount,
    "ls" => ControlWord::ListOverrideIndex,
    "ilvl" => ControlWord::ListLevelIndex,

    // Character formatting
    "b" => ControlWord::Bold,
    "i" => ControlWord::Italic,
    "ul" => ControlWord::Underline,
    "ulnone" => ControlWord::UnderlineNone,
    "strike" => ControlWord::Strike,
    "super" => ControlWord::VerticalAlign(VerticalAlign::Super),
    "sub" => ControlWord::VerticalAlign(VerticalAlign::Sub),
    "nosupersub" => ControlWord::VerticalAlign(VerticalAlign::Normal),
    "fs" => ControlWord::FontSize,
    "cf" => ControlWord::Foreground,
    "cb" => ControlWord::Background,
    "highlight" => ControlWord::Background,
    "plain" => ControlWord::Plain,

    // Paragraph
    "pard" => ControlWord::Pard,
    "par" => ControlWord::Par,
    "ql" => ControlWord::Align(Alignment::Left),
    "qc" => ControlWord::Align(Alignment::Center),
    "qr" => ControlWord::Align(Alignment::Right),
    "qj" => ControlWord::Align(Alignment::Justify),
    "li" => ControlWord::Indent,
    "ri" => ControlWord::RightIndent,
    "fi" => ControlWord::FirstLineIndent,
    "sb" => ControlWord::SpaceBefore,
    "sa" => ControlWord::SpaceAfter,

    // Special characters
    "line" => ControlWord::Symbol("\n"),
    "tab" => ControlWord::Symbol("\t"),
    "emdash" => ControlWord::Symbol("\u{2014}"),
    "endash" => ControlWord::Symbol("\u{2013}"),
    "bullet" => ControlWord::Symbol("\u{2022}"),
    "lquote" => ControlWord::Symbol("\u{2018}"),
    "rquote" => ControlWord::Symbol("\u{2019}"),
    "ldblquote" => ControlWord::Symbol("\u{201C}"),
    "rdblquote" => ControlWord::Symbol("\u{201D}"),
    "emspace" => ControlWord::Symbol("\u{2003}"),
    "enspace" => ControlWord::Symbol("\u{2002}"),

    // Unicode
    "u" => ControlWord::Unicode,

    // Page margins
    "margl" => ControlWord::Margin(Margin::Left),
    "margr" => ControlWord::Margin(Margin::Right),
    "margt" => ControlWord::Margin(Margin::Top),
    "margb" => ControlWord::Margin(Margin::Bottom),
};

/// Look up the handler for a control word.
#[inline]
pub(crate) fn lookup(word: &str) -> Option<ControlWord> {
    CONTROL_WORDS.get(word).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("b"), Some(ControlWord::Bold));
        assert_eq!(
            lookup("qc"),
            Some(ControlWord::Align(Alignment::Center))
        );
        assert_eq!(
            lookup("froman"),
            Some(ControlWord::FontFamily(FontFamily::Roman))
        );
        assert_eq!(lookup("nonexistent"), None);
        assert_eq!(lookup("B"), None);
    }
}
