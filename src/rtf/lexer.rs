//! RTF lexer.
//!
//! Scans raw RTF bytes and produces the [`Command`] stream consumed by the
//! interpreter. The lexer stays charset-agnostic: escaped bytes (`\'hh`) and
//! raw 8-bit bytes come out as [`Command::HexByte`] and are decoded later
//! with the charset of the scope they land in.
//!
//! A few keywords are resolved here because they affect scanning itself:
//!
//! - `\binN` skips `N` bytes of binary data
//! - `\ucN` sets how many fallback characters follow each `\u` (per group)
//! - `\leveltext` and `\levelnumbers` capture their destination text as a
//!   string parameter

use super::command::{Command, Param};
use super::error::{RtfError, RtfResult};
use smallvec::{SmallVec, smallvec};
use std::borrow::Cow;
use std::collections::VecDeque;

/// RTF lexer over a byte slice.
#[derive(Debug)]
pub struct Lexer<'a> {
    /// Source input
    input: &'a [u8],
    /// Current position in bytes
    pos: usize,
    /// `\uc` value of each open group, innermost last
    uc: SmallVec<[usize; 8]>,
    /// Fallback characters still to drop after a `\u`
    skip: usize,
    /// Commands scanned ahead of time
    pending: VecDeque<Command<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer.
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            uc: smallvec![1],
            skip: 0,
            pending: VecDeque::new(),
        }
    }

    /// Create a lexer over text input.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Self::new(input.as_bytes())
    }

    /// Tokenize the entire input.
    pub fn tokenize(&mut self) -> RtfResult<Vec<Command<'a>>> {
        let mut commands = Vec::new();
        while let Some(command) = self.next_command()? {
            commands.push(command);
        }
        Ok(commands)
    }

    /// Current byte offset into the input.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the next command.
    fn next_command(&mut self) -> RtfResult<Option<Command<'a>>> {
        if let Some(command) = self.pending.pop_front() {
            return Ok(Some(command));
        }

        while let Some(byte) = self.peek() {
            match byte {
                b'{' => {
                    self.pos += 1;
                    self.skip = 0;
                    let uc = self.current_uc();
                    self.uc.push(uc);
                    return Ok(Some(Command::GroupStart));
                },
                b'}' => {
                    self.pos += 1;
                    self.skip = 0;
                    if self.uc.len() > 1 {
                        self.uc.pop();
                    }
                    return Ok(Some(Command::GroupEnd));
                },
                b'\r' | b'\n' => self.pos += 1,
                b'\\' => {
                    let Some(command) = self.parse_control()? else {
                        continue;
                    };
                    if self.skip > 0 {
                        // Escapes and control words count as one fallback character
                        self.skip -= 1;
                        continue;
                    }
                    if matches!(&command, Command::Control { word, .. } if word == "u") {
                        self.skip = self.current_uc();
                    }
                    return Ok(Some(command));
                },
                _ if self.skip > 0 => {
                    self.pos += utf8_len(byte);
                    self.skip -= 1;
                },
                _ => return Ok(Some(self.parse_text())),
            }
        }
        Ok(None)
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    fn current_uc(&self) -> usize {
        self.uc.last().copied().unwrap_or(1)
    }

    /// Parse a control word or control symbol.
    fn parse_control(&mut self) -> RtfResult<Option<Command<'a>>> {
        self.pos += 1; // Skip '\'

        let Some(ch) = self.peek() else {
            return Err(RtfError::LexerError(format!(
                "dangling backslash at position {}",
                self.pos - 1
            )));
        };

        let text = |s: &'static str| -> RtfResult<Option<Command<'a>>> {
            Ok(Some(Command::Text(Cow::Borrowed(s))))
        };
        match ch {
            b'\\' => {
                self.pos += 1;
                text("\\")
            },
            b'{' => {
                self.pos += 1;
                text("{")
            },
            b'}' => {
                self.pos += 1;
                text("}")
            },
            b'\'' => {
                self.pos += 1;
                self.parse_hex().map(|byte| Some(Command::HexByte(byte)))
            },
            b'*' => {
                self.pos += 1;
                Ok(Some(Command::Ignorable))
            },
            b'\r' | b'\n' => {
                self.pos += 1;
                Ok(Some(Command::EndParagraph))
            },
            b'~' => {
                self.pos += 1;
                text("\u{00A0}")
            },
            b'-' => {
                self.pos += 1;
                text("\u{00AD}")
            },
            b'_' => {
                self.pos += 1;
                text("\u{2011}")
            },
            ch if ch.is_ascii_alphabetic() => self.parse_word(),
            ch => {
                // Any other control symbol is passed through as a keyword
                let input = self.input;
                let end = (self.pos + utf8_len(ch)).min(input.len());
                let word = String::from_utf8_lossy(&input[self.pos..end]);
                self.pos = end;
                Ok(Some(Command::Control { word, param: None }))
            },
        }
    }

    /// Parse a control word, its parameter and delimiter.
    fn parse_word(&mut self) -> RtfResult<Option<Command<'a>>> {
        let input = self.input;
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        let word = std::str::from_utf8(&input[start..self.pos])
            .map_err(|e| RtfError::LexerError(e.to_string()))?;

        let param = self.parse_numeric_parameter();

        // Skip optional space delimiter after control word
        if self.peek() == Some(b' ') {
            self.pos += 1;
        }

        match word {
            "bin" => {
                let len = usize::try_from(param.unwrap_or(0)).unwrap_or(0);
                self.pos = (self.pos + len).min(self.input.len());
                Ok(None)
            },
            "uc" => {
                let count = usize::try_from(param.unwrap_or(1)).unwrap_or(0);
                if let Some(current) = self.uc.last_mut() {
                    *current = count;
                }
                Ok(None)
            },
            "leveltext" | "levelnumbers" if param.is_none() => {
                let text = self.parse_destination_text()?;
                Ok(Some(Command::Control {
                    word: Cow::Borrowed(word),
                    param: Some(Param::Str(Cow::Owned(text))),
                }))
            },
            _ => Ok(Some(Command::Control {
                word: Cow::Borrowed(word),
                param: param.map(Param::Int),
            })),
        }
    }

    /// Parse numeric parameter after control word.
    fn parse_numeric_parameter(&mut self) -> Option<i32> {
        let start = self.pos;
        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
        }
        let digits = self.pos;
        // Saturates at the i32 range however many digits follow.
        let mut value: i32 = 0;
        while let Some(b) = self.peek().filter(u8::is_ascii_digit) {
            let digit = i32::from(b - b'0');
            value = if negative {
                value.saturating_mul(10).saturating_sub(digit)
            } else {
                value.saturating_mul(10).saturating_add(digit)
            };
            self.pos += 1;
        }
        if self.pos == digits {
            // A lone '-' is not a parameter
            self.pos = start;
            return None;
        }
        Some(value)
    }

    /// Parse the two hex digits of a `\'hh` escape.
    fn parse_hex(&mut self) -> RtfResult<u8> {
        let input = self.input;
        let Some(digits) = input.get(self.pos..self.pos + 2) else {
            return Err(RtfError::InvalidHex(format!(
                "incomplete hex escape at position {}",
                self.pos
            )));
        };
        if !digits.iter().all(u8::is_ascii_hexdigit) {
            return Err(RtfError::InvalidHex(format!(
                "\\'{}",
                String::from_utf8_lossy(digits)
            )));
        }
        self.pos += 2;
        Ok((hex_value(digits[0]) << 4) | hex_value(digits[1]))
    }

    /// Capture the text of a `\leveltext` or `\levelnumbers` destination.
    ///
    /// Stops after the `;` terminator or before the closing brace. Hex
    /// escapes contribute their byte value as a character; control words met
    /// on the way are queued as ordinary commands.
    fn parse_destination_text(&mut self) -> RtfResult<String> {
        let mut text = String::new();

        while let Some(byte) = self.peek() {
            match byte {
                b'{' | b'}' => break,
                b';' => {
                    self.pos += 1;
                    break;
                },
                b'\r' | b'\n' => self.pos += 1,
                b'\\' => match self.input.get(self.pos + 1).copied() {
                    Some(b'\'') => {
                        self.pos += 2;
                        text.push(char::from(self.parse_hex()?));
                    },
                    Some(ch @ (b'\\' | b'{' | b'}')) => {
                        self.pos += 2;
                        text.push(char::from(ch));
                    },
                    Some(ch) if ch.is_ascii_alphabetic() => {
                        self.pos += 1;
                        if let Some(command) = self.parse_word()? {
                            self.pending.push_back(command);
                        }
                    },
                    _ => self.pos = (self.pos + 2).min(self.input.len()),
                },
                _ => {
                    let end = (self.pos + utf8_len(byte)).min(self.input.len());
                    text.push_str(&String::from_utf8_lossy(&self.input[self.pos..end]));
                    self.pos = end;
                },
            }
        }

        Ok(text)
    }

    /// Parse plain text until a special character.
    ///
    /// Line breaks in the source are not content and are dropped. Bytes that
    /// are not valid UTF-8 are 8-bit text in the document charset and come
    /// out one [`Command::HexByte`] at a time.
    fn parse_text(&mut self) -> Command<'a> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| !matches!(b, b'\\' | b'{' | b'}' | b'\r' | b'\n'))
        {
            self.pos += 1;
        }

        let input = self.input;
        let run = &input[start..self.pos];
        match std::str::from_utf8(run) {
            Ok(text) => Command::Text(Cow::Borrowed(text)),
            Err(err) if err.valid_up_to() > 0 => {
                let valid = err.valid_up_to();
                self.pos = start + valid;
                // The prefix was just validated
                Command::Text(String::from_utf8_lossy(&run[..valid]))
            },
            Err(_) => {
                self.pos = start + 1;
                Command::HexByte(run[0])
            },
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = RtfResult<Command<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_command().transpose()
    }
}

/// Length of the UTF-8 sequence introduced by `byte`, 1 for stray bytes.
#[inline]
fn utf8_len(byte: u8) -> usize {
    match byte {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

#[inline]
fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Command<'_>> {
        Lexer::from_str(input).tokenize().unwrap()
    }

    #[test]
    fn test_simple_tokenization() {
        let commands = lex(r"{\rtf1\ansi Hello}");

        assert_eq!(
            commands,
            vec![
                Command::GroupStart,
                Command::word_with("rtf", 1),
                Command::word("ansi"),
                Command::text("Hello"),
                Command::GroupEnd,
            ]
        );
    }

    #[test]
    fn test_parameters_and_delimiters() {
        let commands = lex(r"\fi-360\li720 text\b0\- x");
        assert_eq!(
            commands,
            vec![
                Command::word_with("fi", -360),
                Command::word_with("li", 720),
                Command::text("text"),
                Command::word_with("b", 0),
                Command::text("\u{00AD}"),
                Command::text(" x"),
            ]
        );
    }

    #[test]
    fn test_control_symbols() {
        let commands = lex("\\{\\}\\\\\\*\\~\\\n\\|");
        assert_eq!(
            commands,
            vec![
                Command::text("{"),
                Command::text("}"),
                Command::text("\\"),
                Command::Ignorable,
                Command::text("\u{00A0}"),
                Command::EndParagraph,
                Command::word("|"),
            ]
        );
    }

    #[test]
    fn test_hex_escapes() {
        assert_eq!(
            lex(r"\'e9\'C9"),
            vec![Command::HexByte(0xe9), Command::HexByte(0xc9)]
        );

        let err = Lexer::from_str(r"\'zz").tokenize().unwrap_err();
        assert!(matches!(err, RtfError::InvalidHex(_)));
        let err = Lexer::from_str(r"\'4").tokenize().unwrap_err();
        assert!(matches!(err, RtfError::InvalidHex(_)));
    }

    #[test]
    fn test_line_breaks_are_not_content() {
        assert_eq!(
            lex("one\r\ntwo"),
            vec![Command::text("one"), Command::text("two")]
        );
    }

    #[test]
    fn test_unicode_fallback_is_skipped() {
        assert_eq!(
            lex(r"\u8364?A"),
            vec![Command::word_with("u", 8364), Command::text("A")]
        );
        assert_eq!(
            lex(r"{\uc2\u-3784\'81\'40B}\u233?ok"),
            vec![
                Command::GroupStart,
                Command::word_with("u", -3784),
                Command::text("B"),
                Command::GroupEnd,
                Command::word_with("u", 233),
                Command::text("ok"),
            ]
        );
        assert_eq!(
            lex(r"\uc0\u233 e"),
            vec![Command::word_with("u", 233), Command::text("e")]
        );
    }

    #[test]
    fn test_binary_data_is_skipped() {
        assert_eq!(
            lex("{\\bin3 \\{}x}"),
            vec![Command::GroupStart, Command::text("x"), Command::GroupEnd]
        );
    }

    #[test]
    fn test_level_text_destination() {
        let commands = lex(r"{\leveltext\leveltemplateid67698703\'02\'00.;}");
        assert_eq!(
            commands,
            vec![
                Command::GroupStart,
                Command::word_with("leveltext", "\u{2}\u{0}."),
                Command::word_with("leveltemplateid", 67698703),
                Command::GroupEnd,
            ]
        );
    }

    #[test]
    fn test_oversized_parameters_saturate() {
        let commands = lex(r"\fs99999999999999999999 x\li-99999999999999999999 y\sb2147483648 z");
        assert_eq!(
            commands,
            vec![
                Command::word_with("fs", i32::MAX),
                Command::text("x"),
                Command::word_with("li", i32::MIN),
                Command::text("y"),
                Command::word_with("sb", i32::MAX),
                Command::text("z"),
            ]
        );
    }

    #[test]
    fn test_raw_8bit_text() {
        let input = b"caf\xe9 ok";
        let commands = Lexer::new(input).tokenize().unwrap();
        assert_eq!(
            commands,
            vec![
                Command::text("caf"),
                Command::HexByte(0xe9),
                Command::text(" ok"),
            ]
        );
        assert_eq!(lex("naïve"), vec![Command::text("naïve")]);
    }

    #[test]
    fn test_dangling_backslash() {
        let err = Lexer::from_str("abc\\").tokenize().unwrap_err();
        assert!(matches!(err, RtfError::LexerError(_)));
    }
}
