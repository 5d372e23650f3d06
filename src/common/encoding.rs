//! Character encoding utilities for RTF text decoding.
//!
//! RTF carries non-ASCII text either as hex-escaped bytes in the active
//! codepage or as signed 16-bit UTF-16 code units. Windows, CJK and Mac
//! codepages go through `encoding_rs`, the OEM (DOS) codepages through the
//! `oem_cp` tables, and Korean Johab is unpacked here on top of the
//! `encoding_rs` EUC-KR table.

use encoding_rs::Encoding;
use oem_cp::code_table::DECODING_TABLE_CP_MAP;
use oem_cp::code_table_type::TableType;
use std::borrow::Cow;

/// Windows codepage number for Johab.
pub const JOHAB_CODEPAGE: u16 = 1361;

/// A byte-to-text decoder for one codepage.
#[derive(Clone, Copy)]
pub enum Codec {
    /// WHATWG codec from `encoding_rs`
    Whatwg(&'static Encoding),
    /// OEM single-byte table from `oem_cp`
    Oem(&'static TableType),
    /// Korean Johab (KS X 1001 annex 3)
    Johab,
}

impl Codec {
    /// Decode a byte run.
    ///
    /// BOM sniffing is disabled: a hex run is never a document start.
    /// Undecodable bytes become U+FFFD.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match self {
            Codec::Whatwg(encoding) => encoding.decode_without_bom_handling(bytes).0,
            Codec::Oem(table) => Cow::Owned(table.decode_string_lossy(bytes)),
            Codec::Johab => Cow::Owned(decode_johab(bytes)),
        }
    }
}

/// Map a Windows/DOS/Mac codepage identifier to an `encoding_rs` encoding.
///
/// Returns `None` for codepages that `encoding_rs` does not implement, most
/// notably the OEM (DOS) codepages other than 866.
///
/// # Examples
/// ```
/// use rtf_interpreter::common::encoding::codepage_to_encoding;
///
/// let encoding = codepage_to_encoding(936).unwrap();
/// assert_eq!(encoding.name(), "GBK");
/// assert!(codepage_to_encoding(437).is_none());
/// ```
#[inline]
pub fn codepage_to_encoding(codepage: u16) -> Option<&'static Encoding> {
    match codepage {
        // DOS codepages
        866 => Some(encoding_rs::IBM866),

        // Windows codepages (Western scripts)
        874 => Some(encoding_rs::WINDOWS_874),
        1250 => Some(encoding_rs::WINDOWS_1250),
        1251 => Some(encoding_rs::WINDOWS_1251),
        1252 => Some(encoding_rs::WINDOWS_1252),
        1253 => Some(encoding_rs::WINDOWS_1253),
        1254 => Some(encoding_rs::WINDOWS_1254),
        1255 => Some(encoding_rs::WINDOWS_1255),
        1256 => Some(encoding_rs::WINDOWS_1256),
        1257 => Some(encoding_rs::WINDOWS_1257),
        1258 => Some(encoding_rs::WINDOWS_1258),

        // East Asian codepages
        932 => Some(encoding_rs::SHIFT_JIS),
        936 => Some(encoding_rs::GBK),
        949 => Some(encoding_rs::EUC_KR),
        950 => Some(encoding_rs::BIG5),

        // Macintosh
        10000 => Some(encoding_rs::MACINTOSH),

        _ => None,
    }
}

/// Find a codec for a codepage.
///
/// # Examples
/// ```
/// use rtf_interpreter::common::encoding::codepage_to_codec;
///
/// assert_eq!(codepage_to_codec(437).unwrap().decode(b"\x82t\x82"), "été");
/// assert!(codepage_to_codec(42).is_none());
/// ```
pub fn codepage_to_codec(codepage: u16) -> Option<Codec> {
    if codepage == JOHAB_CODEPAGE {
        return Some(Codec::Johab);
    }
    codepage_to_encoding(codepage)
        .map(Codec::Whatwg)
        .or_else(|| DECODING_TABLE_CP_MAP.get(&codepage).map(Codec::Oem))
}

// Johab packs a Hangul syllable into 15 bits: five each for the initial,
// medial and final jamo. These map the 5-bit fields to Unicode jamo indices.
const JOHAB_INITIAL: [Option<u8>; 32] = {
    let mut table = [None; 32];
    let mut i = 2;
    while i <= 20 {
        table[i] = Some((i - 2) as u8);
        i += 1;
    }
    table
};

const JOHAB_MEDIAL: [Option<u8>; 32] = {
    let mut table = [None; 32];
    let ranges: [(usize, usize, usize); 4] = [(3, 7, 3), (10, 15, 5), (18, 23, 7), (26, 29, 9)];
    let mut r = 0;
    while r < ranges.len() {
        let (start, end, offset) = ranges[r];
        let mut m = start;
        while m <= end {
            table[m] = Some((m - offset) as u8);
            m += 1;
        }
        r += 1;
    }
    table
};

const JOHAB_FINAL: [Option<u8>; 32] = {
    let mut table = [None; 32];
    let mut f = 2;
    while f <= 29 {
        if f != 18 {
            let index = if f < 18 { f - 1 } else { f - 2 };
            table[f] = Some(index as u8);
        }
        f += 1;
    }
    table
};

const JOHAB_FILL_INITIAL: usize = 1;
const JOHAB_FILL_MEDIAL: usize = 2;
const JOHAB_FILL_FINAL: usize = 1;

/// Compatibility jamo for initial consonants, by initial index.
const COMPAT_INITIAL: [u16; 19] = [
    0x3131, 0x3132, 0x3134, 0x3137, 0x3138, 0x3139, 0x3141, 0x3142, 0x3143, 0x3145, 0x3146,
    0x3147, 0x3148, 0x3149, 0x314A, 0x314B, 0x314C, 0x314D, 0x314E,
];

/// Compatibility jamo for final consonants, by final index minus one.
const COMPAT_FINAL: [u16; 27] = [
    0x3131, 0x3132, 0x3133, 0x3134, 0x3135, 0x3136, 0x3137, 0x3139, 0x313A, 0x313B, 0x313C,
    0x313D, 0x313E, 0x313F, 0x3140, 0x3141, 0x3142, 0x3144, 0x3145, 0x3146, 0x3147, 0x3148,
    0x314A, 0x314B, 0x314C, 0x314D, 0x314E,
];

fn johab_hangul(code: u16) -> Option<char> {
    let initial = usize::from((code >> 10) & 0x1F);
    let medial = usize::from((code >> 5) & 0x1F);
    let last = usize::from(code & 0x1F);

    let cho = JOHAB_INITIAL[initial];
    let jung = JOHAB_MEDIAL[medial];
    let jong = if last == JOHAB_FILL_FINAL {
        Some(0)
    } else {
        JOHAB_FINAL[last]
    };

    let scalar = match (cho, jung, jong?) {
        (Some(cho), Some(jung), jong) => {
            0xAC00 + (u32::from(cho) * 21 + u32::from(jung)) * 28 + u32::from(jong)
        },
        (Some(cho), None, 0) if medial == JOHAB_FILL_MEDIAL => {
            u32::from(COMPAT_INITIAL[usize::from(cho)])
        },
        (None, Some(jung), 0) if initial == JOHAB_FILL_INITIAL => 0x314F + u32::from(jung),
        (None, None, jong) if initial == JOHAB_FILL_INITIAL && medial == JOHAB_FILL_MEDIAL => {
            match jong {
                0 => 0x3164,
                jong => u32::from(COMPAT_FINAL[usize::from(jong) - 1]),
            }
        },
        _ => return None,
    };
    char::from_u32(scalar)
}

/// Symbols and Hanja sit in a rearranged copy of the KS X 1001 rows.
fn johab_symbol(lead: u8, trail: u8) -> Option<char> {
    let row = if lead < 0xE0 {
        2 * (lead - 0xD9)
    } else {
        (2 * u16::from(lead) - 0x197) as u8
    };
    let column = if trail < 0x91 { trail - 0x31 } else { trail - 0x43 };
    let (row, column) = if column < 0x5E {
        (row, column)
    } else {
        (row + 1, column - 0x5E)
    };
    let euc = [(row + 0x21) | 0x80, (column + 0x21) | 0x80];
    let (text, had_errors) = encoding_rs::EUC_KR.decode_without_bom_handling(&euc);
    if had_errors {
        return None;
    }
    text.chars().next()
}

/// Decode Korean Johab.
///
/// # Examples
/// ```
/// use rtf_interpreter::common::encoding::decode_johab;
///
/// assert_eq!(decode_johab(&[0xD0, 0x65, 0x88, 0x61]), "한가");
/// ```
pub fn decode_johab(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let lead = bytes[i];
        if lead.is_ascii() {
            text.push(char::from(lead));
            i += 1;
            continue;
        }
        let Some(&trail) = bytes.get(i + 1) else {
            text.push(char::REPLACEMENT_CHARACTER);
            break;
        };
        let decoded = match lead {
            0x84..=0xD3 if matches!(trail, 0x41..=0x7E | 0x81..=0xFE) => {
                johab_hangul(u16::from_be_bytes([lead, trail]))
            },
            0xD9..=0xDE | 0xE0..=0xF9 if matches!(trail, 0x31..=0x7E | 0x91..=0xFE) => {
                johab_symbol(lead, trail)
            },
            _ => {
                // Not a lead byte: only this byte is lost.
                text.push(char::REPLACEMENT_CHARACTER);
                i += 1;
                continue;
            },
        };
        text.push(decoded.unwrap_or(char::REPLACEMENT_CHARACTER));
        i += 2;
    }
    text
}

/// Decode UTF-16 code units as little-endian UCS-2/UTF-16.
///
/// Unpaired surrogates are replaced with U+FFFD.
///
/// # Examples
/// ```
/// use rtf_interpreter::common::encoding::decode_utf16_units;
///
/// assert_eq!(decode_utf16_units(&[0x0048, 0x0069]), "Hi");
/// assert_eq!(decode_utf16_units(&[0xD83D, 0xDE00]), "\u{1F600}");
/// assert_eq!(decode_utf16_units(&[0xD83D]), "\u{FFFD}");
/// ```
pub fn decode_utf16_units(units: &[u16]) -> String {
    let bytes: Vec<u8> = units.iter().flat_map(|unit| unit.to_le_bytes()).collect();
    encoding_rs::UTF_16LE
        .decode_without_bom_handling(&bytes)
        .0
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_shift_jis_run() {
        // "日本" in Shift-JIS
        let bytes = [0x93, 0xFA, 0x96, 0x7B];
        let text = codepage_to_codec(932).unwrap().decode(&bytes);
        assert_eq!(text, "日本");
    }

    #[test]
    fn test_oem_codepages() {
        assert_eq!(codepage_to_codec(437).unwrap().decode(&[0x82]), "é");
        assert_eq!(codepage_to_codec(850).unwrap().decode(&[0x90]), "É");
        // cp852 0xA5 is "ą"
        assert_eq!(codepage_to_codec(852).unwrap().decode(&[0xA5]), "ą");
        assert_eq!(codepage_to_codec(866).unwrap().decode(&[0x80]), "А");
    }

    #[test]
    fn test_johab_syllables_and_jamo() {
        assert_eq!(decode_johab(&[0xD0, 0x65]), "한");
        // initial ㄱ alone, medial ㅏ alone
        assert_eq!(decode_johab(&[0x88, 0x41]), "ㄱ");
        assert_eq!(decode_johab(&[0x84, 0x61]), "ㅏ");
        assert_eq!(decode_johab(b"a\x88\x61b"), "a가b");
    }

    #[test]
    fn test_johab_symbols() {
        // first KS X 1001 cell: ideographic space
        assert_eq!(decode_johab(&[0xD9, 0x31]), "\u{3000}");
    }

    #[test]
    fn test_johab_truncated_and_invalid() {
        assert_eq!(decode_johab(&[0xD0]), "\u{FFFD}");
        assert_eq!(decode_johab(&[0x80, b'x']), "\u{FFFD}x");
    }

    #[test]
    fn test_byte_order_mark_is_kept() {
        assert_eq!(decode_utf16_units(&[0xFEFF]), "\u{FEFF}");
    }
}
