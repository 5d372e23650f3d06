//! Charset resolution for RTF text.
//!
//! RTF names encodings two ways: `\ansicpg` carries a Windows codepage
//! number, and `\fcharset` carries a font charset code. Both resolve to a
//! [`Charset`], which knows its canonical name and how to decode hex runs.

use crate::common::encoding::{Codec, JOHAB_CODEPAGE, codepage_to_codec};
use phf::{Map, Set, phf_map, phf_set};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// A resolved text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    /// ANSI (`\ansi`, `\fcharset0`)
    Ascii,
    /// Mac Roman (`\mac`, `\fcharset77`)
    MacRoman,
    /// Japanese Shift-JIS (`\fcharset128`)
    ShiftJis,
    /// Korean Johab (`\fcharset130`)
    Johab,
    /// Traditional Chinese Big5 (`\fcharset136`)
    Big5,
    /// Numbered Windows or DOS codepage
    CodePage(u16),
}

/// `\fcharset` codes understood by the interpreter.
static FONT_CHARSETS: Map<u8, Charset> = phf_map! {
    0u8 => Charset::Ascii,
    77u8 => Charset::MacRoman,
    128u8 => Charset::ShiftJis,
    129u8 => Charset::CodePage(949),
    130u8 => Charset::Johab,
    134u8 => Charset::CodePage(936),
    136u8 => Charset::Big5,
    161u8 => Charset::CodePage(1253),
    162u8 => Charset::CodePage(1254),
    163u8 => Charset::CodePage(1258),
    177u8 => Charset::CodePage(1255),
    178u8 => Charset::CodePage(1256),
    186u8 => Charset::CodePage(1257),
    204u8 => Charset::CodePage(1251),
    222u8 => Charset::CodePage(874),
    238u8 => Charset::CodePage(1250),
    254u8 => Charset::CodePage(437),
    255u8 => Charset::CodePage(850),
};

/// Codepages accepted by `\ansicpg`.
static ANSI_CODEPAGES: Set<u16> = phf_set! {
    437u16, 737u16, 775u16, 850u16, 852u16, 853u16, 855u16, 857u16, 858u16,
    860u16, 861u16, 863u16, 865u16, 866u16, 869u16, 874u16, 932u16, 936u16,
    949u16, 950u16, 1125u16, 1250u16, 1251u16, 1252u16, 1253u16, 1254u16,
    1255u16, 1256u16, 1257u16, 1258u16, 10000u16,
};

impl Charset {
    /// Charset the document starts with before any `\ansi`/`\ansicpg`.
    pub const DEFAULT: Charset = Charset::CodePage(1252);

    /// Resolve a `\fcharset` code that has an available codec.
    ///
    /// # Examples
    /// ```
    /// use rtf_interpreter::rtf::Charset;
    ///
    /// assert_eq!(Charset::from_font_charset(128), Some(Charset::ShiftJis));
    /// assert_eq!(Charset::from_font_charset(2), None);
    /// ```
    pub fn from_font_charset(code: i32) -> Option<Self> {
        let code = u8::try_from(code).ok()?;
        FONT_CHARSETS
            .get(&code)
            .copied()
            .filter(|charset| charset.codec().is_some())
    }

    /// Resolve an `\ansicpg` codepage against the allow-list.
    ///
    /// Codepages without an available codec resolve to `None` as well.
    ///
    /// # Examples
    /// ```
    /// use rtf_interpreter::rtf::Charset;
    ///
    /// assert_eq!(Charset::from_codepage(1251), Some(Charset::CodePage(1251)));
    /// assert_eq!(Charset::from_codepage(65001), None);
    /// ```
    pub fn from_codepage(codepage: i32) -> Option<Self> {
        let codepage = u16::try_from(codepage).ok()?;
        ANSI_CODEPAGES
            .contains(&codepage)
            .then_some(Charset::CodePage(codepage))
            .filter(|charset| charset.codec().is_some())
    }

    /// Canonical encoding name.
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            Charset::Ascii => Cow::Borrowed("ASCII"),
            Charset::MacRoman => Cow::Borrowed("MacRoman"),
            Charset::ShiftJis => Cow::Borrowed("SHIFT_JIS"),
            Charset::Johab => Cow::Borrowed("JOHAB"),
            Charset::Big5 => Cow::Borrowed("BIG5"),
            Charset::CodePage(cp) => Cow::Owned(format!("CP{}", cp)),
        }
    }

    /// The codec for this charset, if one is available.
    pub fn codec(&self) -> Option<Codec> {
        match self {
            // WHATWG treats the "ascii" label as windows-1252
            Charset::Ascii => Some(Codec::Whatwg(encoding_rs::WINDOWS_1252)),
            Charset::MacRoman => Some(Codec::Whatwg(encoding_rs::MACINTOSH)),
            Charset::ShiftJis => Some(Codec::Whatwg(encoding_rs::SHIFT_JIS)),
            Charset::Big5 => Some(Codec::Whatwg(encoding_rs::BIG5)),
            Charset::Johab => codepage_to_codec(JOHAB_CODEPAGE),
            Charset::CodePage(cp) => codepage_to_codec(*cp),
        }
    }

    /// Decode a run of bytes in this charset.
    ///
    /// Without a codec ASCII bytes pass through and the others become U+FFFD.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match self.codec() {
            Some(codec) => codec.decode(bytes),
            None => {
                log::warn!("no codec for charset {}, non-ASCII bytes replaced", self.name());
                let replace = |b: u8| {
                    if b.is_ascii() {
                        char::from(b)
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                };
                Cow::Owned(bytes.iter().copied().map(replace).collect())
            },
        }
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl Serialize for Charset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}
