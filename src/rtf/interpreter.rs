//! RTF command interpreter.
//!
//! [`Interpreter`] consumes a [`Command`] stream one command at a time and
//! builds a [`Document`]. It keeps a stack of brace scopes: every group start
//! opens a scope that inherits the enclosing style, control words edit the
//! current scope, and every group end folds the closed scope's content into
//! its parent according to the scope's kind.
//!
//! # Example
//!
//! ```
//! use rtf_interpreter::rtf::{Command, Interpreter};
//!
//! let mut interpreter = Interpreter::new();
//! for command in [
//!     Command::GroupStart,
//!     Command::word_with("rtf", 1),
//!     Command::word("b"),
//!     Command::text("Hello"),
//!     Command::word("par"),
//!     Command::GroupEnd,
//! ] {
//!     interpreter.write(command)?;
//! }
//!
//! let result = interpreter.finish()?;
//! assert_eq!(result.document().text(), "Hello\n");
//! # Ok::<(), rtf_interpreter::rtf::RtfError>(())
//! ```

use super::charset::Charset;
use super::command::{Command, Param};
use super::control::{self, ControlWord, Margin};
use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::document::{Document, RtfDocument};
use super::error::{RtfError, RtfResult};
use super::list::{List, ListLevel, ListOverride, ListOverrideTable, ListTable};
use super::scope::{Scope, ScopeArena, ScopeId, ScopeKind};
use super::style::{BaseStyle, Style};
use super::types::{Color, Content, Font, Paragraph, Span};
use crate::common::encoding::decode_utf16_units;
use smallvec::SmallVec;

/// Interpreter configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterpreterOptions {
    /// Promote unknown command kinds, unbalanced group ends and malformed
    /// color tables to hard errors.
    pub strict: bool,
    /// Record a debug diagnostic for every closed scope.
    pub trace_groups: bool,
}

impl InterpreterOptions {
    /// Lenient options.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict mode.
    #[inline]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set group-close tracing.
    #[inline]
    pub fn with_group_trace(mut self, trace: bool) -> Self {
        self.trace_groups = trace;
        self
    }
}

/// Streaming RTF command interpreter.
#[derive(Debug)]
pub struct Interpreter {
    options: InterpreterOptions,
    scopes: ScopeArena,
    /// Enclosing scopes of `current`, innermost last
    stack: SmallVec<[ScopeId; 16]>,
    current: ScopeId,
    /// Hex bytes not yet decoded
    hex: SmallVec<[u8; 16]>,
    /// High surrogate waiting for its low half
    high_surrogate: Option<u16>,
    /// Style restored by `\pard`
    defaults: Style,
    document: Document,
    diagnostics: Diagnostics,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create an interpreter with default options.
    pub fn new() -> Self {
        Self::with_options(InterpreterOptions::default())
    }

    /// Create an interpreter with the given options.
    pub fn with_options(options: InterpreterOptions) -> Self {
        let defaults = Style::default();
        let root = Scope::root(defaults.clone(), Charset::DEFAULT);

        Self {
            options,
            scopes: ScopeArena::new(root),
            stack: SmallVec::new(),
            current: ScopeId::ROOT,
            hex: SmallVec::new(),
            high_surrogate: None,
            defaults,
            document: Document::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Interpret a whole command stream.
    pub fn run<'a, I>(commands: I, options: InterpreterOptions) -> RtfResult<RtfDocument>
    where
        I: IntoIterator<Item = Command<'a>>,
    {
        let mut interpreter = Self::with_options(options);
        for command in commands {
            interpreter.write(command)?;
        }
        interpreter.finish()
    }

    /// Options in use.
    #[inline]
    pub fn options(&self) -> InterpreterOptions {
        self.options
    }

    /// Number of open groups.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Diagnostics recorded so far.
    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Process one command.
    ///
    /// Only strict mode returns errors; otherwise problems are recorded as
    /// diagnostics and interpretation continues.
    pub fn write(&mut self, command: Command<'_>) -> RtfResult<()> {
        let is_unicode = matches!(&command, Command::Control { word, .. } if word == "u");
        if !matches!(command, Command::HexByte(_)) {
            self.flush_hex()?;
        }
        if !is_unicode {
            self.flush_surrogate()?;
        }

        match command {
            Command::GroupStart => {
                self.group_start();
                Ok(())
            },
            Command::GroupEnd => self.group_end(false),
            Command::Control { word, param } => self.control(&word, param.as_ref()),
            Command::Text(text) => self.emit_text(text.into_owned()),
            Command::HexByte(byte) => {
                self.hex.push(byte);
                Ok(())
            },
            Command::Ignorable => {
                self.mark_ignorable();
                Ok(())
            },
            Command::EndParagraph => self.emit_paragraph(),
            Command::Unknown(kind) => {
                self.diagnostics.error(
                    DiagnosticKind::UnknownCommand,
                    format!("unknown command kind '{}'", kind),
                );
                if self.options.strict {
                    return Err(RtfError::UnknownCommand(kind.into_owned()));
                }
                Ok(())
            },
        }
    }

    /// End of stream: close open groups and produce the document.
    pub fn finish(mut self) -> RtfResult<RtfDocument> {
        self.flush_hex()?;
        self.flush_surrogate()?;

        while !self.stack.is_empty() {
            self.group_end(true)?;
        }

        let trailing = take_spans(&mut self.scopes[ScopeId::ROOT].content);
        if !trailing.is_empty() {
            let mut paragraph = Paragraph::new(self.scopes[ScopeId::ROOT].style.clone());
            paragraph.spans = trailing;
            self.document.content.push(paragraph);
        }

        self.document.style =
            BaseStyle::common(self.document.content.iter().map(|p| &p.style));

        log::debug!(
            "interpreted {} paragraphs, {} fonts, {} colors",
            self.document.content.len(),
            self.document.fonts.len(),
            self.document.colors.len()
        );
        Ok(RtfDocument::new(self.document, self.diagnostics))
    }

    fn group_start(&mut self) {
        let parent = self.current;
        let style = self.scopes[parent].style.clone();
        let child = self.scopes.alloc(Scope::child(parent, style));
        self.stack.push(parent);
        self.current = child;
    }

    fn group_end(&mut self, finalizing: bool) -> RtfResult<()> {
        let Some(parent) = self.stack.pop() else {
            if !finalizing {
                let message = "group end without an open group";
                self.diagnostics.error(DiagnosticKind::UnbalancedGroup, message);
                if self.options.strict {
                    return Err(RtfError::UnbalancedGroup(message.to_string()));
                }
            }
            return Ok(());
        };

        let ending = std::mem::replace(&mut self.current, parent);
        if ending == ScopeId::ROOT {
            return Ok(());
        }

        let ignorable = self.scopes.is_ignorable(ending);
        let scope = self.scopes.release(ending);

        log::trace!("closing {} scope (ignorable: {})", scope.kind.name(), ignorable);
        if self.options.trace_groups {
            self.diagnostics.debug(
                DiagnosticKind::GroupClosed,
                format!("{} closed at depth {}", scope.kind.name(), self.stack.len() + 1),
            );
        }

        match scope.kind {
            ScopeKind::FontTable { fonts, .. } => self.document.fonts = fonts,
            ScopeKind::ColorTable { colors, .. } => self.document.colors = colors,
            ScopeKind::ListTable(lists) => self.document.lists = lists,
            ScopeKind::ListOverrideTable(overrides) => self.document.override_lists = overrides,
            ScopeKind::List(list) => match &mut self.scopes[parent].kind {
                ScopeKind::ListTable(table) => table.add(list),
                _ => self.discard("list outside a list table"),
            },
            ScopeKind::ListLevel(level) => match &mut self.scopes[parent].kind {
                ScopeKind::List(list) => list.add_level(level),
                _ => self.discard("list level outside a list"),
            },
            ScopeKind::ListOverride(entry) => match &mut self.scopes[parent].kind {
                ScopeKind::ListOverrideTable(table) => table.add(entry),
                _ => self.discard("list override outside a list override table"),
            },
            ScopeKind::Document | ScopeKind::Plain => {
                if !ignorable {
                    for item in scope.content {
                        self.add_content(parent, item)?;
                    }
                }
            },
        }
        Ok(())
    }

    /// Deliver one content item to `target` according to its kind.
    fn add_content(&mut self, target: ScopeId, item: Content) -> RtfResult<()> {
        let scope = &mut self.scopes[target];
        let kind_name = scope.kind.name();
        match &mut scope.kind {
            ScopeKind::Document => match item {
                Content::Span(span) => scope.content.push(Content::Span(span)),
                Content::Paragraph(mut paragraph) => {
                    paragraph.spans = take_spans(&mut scope.content);
                    self.document.content.push(paragraph);
                },
            },
            ScopeKind::Plain => scope.content.push(item),
            ScopeKind::FontTable { fonts, current } => {
                if let Content::Span(span) = item {
                    let font = match *current {
                        Some(id) => fonts.get_mut(id),
                        None => None,
                    };
                    match font {
                        Some(font) => font.push_name(&span.value),
                        None if span.value.trim().is_empty() => {},
                        None => self.diagnostics.debug(
                            DiagnosticKind::DiscardedContent,
                            format!("font table text '{}' before any font", span.value),
                        ),
                    }
                }
            },
            ScopeKind::ColorTable {
                colors,
                red,
                green,
                blue,
            } => {
                let Content::Span(span) = item else {
                    return Ok(());
                };
                let mut stray = String::new();
                for ch in span.value.chars() {
                    match ch {
                        ';' => {
                            colors.add(Color::new(*red, *green, *blue));
                            (*red, *green, *blue) = (0, 0, 0);
                        },
                        ch if ch.is_whitespace() => {},
                        ch => stray.push(ch),
                    }
                }
                if !stray.is_empty() {
                    let message = format!("unexpected text '{}' in color table", stray);
                    self.diagnostics.error(DiagnosticKind::MalformedTable, message.clone());
                    if self.options.strict {
                        return Err(RtfError::MalformedTable(message));
                    }
                }
            },
            ScopeKind::ListTable(_)
            | ScopeKind::List(_)
            | ScopeKind::ListLevel(_)
            | ScopeKind::ListOverrideTable(_)
            | ScopeKind::ListOverride(_) => {
                if let Content::Span(span) = item
                    && !span.value.trim().is_empty()
                {
                    self.diagnostics.debug(
                        DiagnosticKind::DiscardedContent,
                        format!("text '{}' inside {}", span.value, kind_name),
                    );
                }
            },
        }
        Ok(())
    }

    fn discard(&mut self, what: &str) {
        self.diagnostics
            .debug(DiagnosticKind::DiscardedContent, format!("dropped {}", what));
    }

    fn emit_text(&mut self, value: String) -> RtfResult<()> {
        if value.is_empty() {
            return Ok(());
        }
        let style = self.scopes[self.current].style.clone();
        self.add_content(self.current, Content::Span(Span { value, style }))
    }

    fn emit_paragraph(&mut self) -> RtfResult<()> {
        let style = self.scopes[self.current].style.clone();
        self.add_content(self.current, Content::Paragraph(Paragraph::new(style)))
    }

    /// Decode buffered hex bytes with the charset in effect.
    fn flush_hex(&mut self) -> RtfResult<()> {
        if self.hex.is_empty() {
            return Ok(());
        }
        let charset = self.scopes.resolve_charset(self.current);
        let text = charset.decode(&self.hex).into_owned();
        self.hex.clear();
        self.emit_text(text)
    }

    /// Emit a high surrogate that never got its low half.
    fn flush_surrogate(&mut self) -> RtfResult<()> {
        match self.high_surrogate.take() {
            Some(high) => self.emit_text(decode_utf16_units(&[high])),
            None => Ok(()),
        }
    }

    fn unicode(&mut self, value: i32) -> RtfResult<()> {
        // Negative values are the signed 16-bit spelling of the same code unit.
        let unit = value as u16;

        if let Some(high) = self.high_surrogate.take() {
            if (0xDC00..=0xDFFF).contains(&unit) {
                return self.emit_text(decode_utf16_units(&[high, unit]));
            }
            self.emit_text(decode_utf16_units(&[high]))?;
        }

        if (0xD800..=0xDBFF).contains(&unit) {
            self.high_surrogate = Some(unit);
            return Ok(());
        }
        self.emit_text(decode_utf16_units(&[unit]))
    }

    #[inline]
    fn style_mut(&mut self) -> &mut Style {
        &mut self.scopes[self.current].style
    }

    fn control(&mut self, word: &str, param: Option<&Param<'_>>) -> RtfResult<()> {
        let Some(handler) = control::lookup(word) else {
            if !self.scopes.is_ignorable(self.current) {
                self.diagnostics.debug(
                    DiagnosticKind::UnknownControlWord,
                    format!("unhandled control word \\{}", word),
                );
            }
            return Ok(());
        };
        let value = param.and_then(Param::as_int);

        match handler {
            ControlWord::Rtf => return self.enter_document(),
            ControlWord::Charset(charset) => self.scopes[self.current].charset = Some(charset),
            ControlWord::AnsiCodePage => match value.and_then(Charset::from_codepage) {
                Some(charset) => self.scopes[self.current].charset = Some(charset),
                None => self.diagnostics.error(
                    DiagnosticKind::UnsupportedCodepage,
                    format!("codepage {} is not supported", display_param(value)),
                ),
            },
            ControlWord::DefaultFont => {
                if let Some(font) = value {
                    self.defaults.font = font;
                    self.style_mut().font = font;
                }
            },
            ControlWord::Destination => self.mark_ignorable(),

            ControlWord::FontTable => self.begin_table(ScopeKind::font_table()),
            ControlWord::Font => {
                if let Some(id) = value {
                    self.select_font(id);
                }
            },
            ControlWord::FontFamily(family) => {
                if let Some(font) = self.table_font() {
                    font.family = family;
                }
            },
            ControlWord::FontCharset => {
                if let Some(code) = value {
                    self.font_charset(code);
                }
            },
            ControlWord::FontPitch => {
                if let Some(pitch) = value
                    && let Some(font) = self.current_font()
                {
                    font.pitch = Some(pitch);
                }
            },

            ControlWord::ColorTable => self.begin_table(ScopeKind::color_table()),
            ControlWord::Red | ControlWord::Green | ControlWord::Blue => {
                if let Some(value) = value
                    && let ScopeKind::ColorTable {
                        red, green, blue, ..
                    } = &mut self.scopes[self.current].kind
                {
                    let component = value.clamp(0, 255) as u8;
                    match handler {
                        ControlWord::Red => *red = component,
                        ControlWord::Green => *green = component,
                        _ => *blue = component,
                    }
                }
            },

            ControlWord::ListTable => self.begin_table(ScopeKind::ListTable(ListTable::new())),
            ControlWord::List => self.begin_table(ScopeKind::List(List::new())),
            ControlWord::ListLevel => {
                let parent = self.scopes[self.current].parent;
                let index = match parent.map(|p| &self.scopes[p].kind) {
                    Some(ScopeKind::List(list)) => {
                        u8::try_from(list.levels.len()).unwrap_or(u8::MAX)
                    },
                    _ => 0,
                };
                self.begin_table(ScopeKind::ListLevel(ListLevel::new(index)));
            },
            ControlWord::ListId => {
                if let Some(id) = value {
                    let kind = self.nearby_kind(|kind| {
                        matches!(kind, ScopeKind::List(_) | ScopeKind::ListOverride(_))
                    });
                    match kind {
                        Some(ScopeKind::List(list)) => list.id = Some(id),
                        Some(ScopeKind::ListOverride(entry)) => entry.list_id = Some(id),
                        _ => {},
                    }
                }
            },
            ControlWord::ListTemplateId => {
                if let Some(id) = value
                    && let Some(list) = self.list()
                {
                    list.template_id = Some(id);
                }
            },
            ControlWord::ListSimple => {
                if let Some(list) = self.list() {
                    list.simple = value.is_none_or(|v| v != 0);
                }
            },
            ControlWord::ListHybrid => {
                if let Some(list) = self.list() {
                    list.hybrid = true;
                }
            },
            ControlWord::LevelStartAt => self.set_level(value, |level, v| level.start_at = Some(v)),
            ControlWord::LevelNfc => self.set_level(value, |level, v| level.nfc = Some(v)),
            ControlWord::LevelNfcn => self.set_level(value, |level, v| level.nfcn = Some(v)),
            ControlWord::LevelJc => self.set_level(value, |level, v| level.jc = Some(v)),
            ControlWord::LevelJcn => self.set_level(value, |level, v| level.jcn = Some(v)),
            ControlWord::LevelFollow => self.set_level(value, |level, v| level.follow = Some(v)),
            ControlWord::LevelIndent => self.set_level(value, |level, v| level.indent = Some(v)),
            ControlWord::LevelSpace => self.set_level(value, |level, v| level.space = Some(v)),
            ControlWord::LevelText => {
                if let Some(text) = param.map(Param::to_text)
                    && let Some(level) = self.list_level()
                {
                    level.level_text = Some(text);
                }
            },
            ControlWord::LevelNumbers => {
                if let Some(text) = param.map(Param::to_text)
                    && let Some(level) = self.list_level()
                {
                    level.level_numbers = Some(text);
                }
            },

            ControlWord::ListOverrideTable => {
                self.begin_table(ScopeKind::ListOverrideTable(ListOverrideTable::new()))
            },
            ControlWord::ListOverride => {
                self.begin_table(ScopeKind::ListOverride(ListOverride::new()))
            },
            ControlWord::ListOverrideCount => {
                if let Some(count) = value
                    && let Some(entry) = self.list_override()
                {
                    entry.override_count = Some(count);
                }
            },
            ControlWord::ListOverrideIndex => {
                if let Some(ls) = value {
                    match self.list_override() {
                        Some(entry) => entry.ls = Some(ls),
                        None => self.style_mut().list_override = Some(ls),
                    }
                }
            },
            ControlWord::ListLevelIndex => {
                if let Some(level) = value {
                    self.style_mut().list_level = Some(level);
                }
            },

            ControlWord::Bold => self.style_mut().bold = toggle(value),
            ControlWord::Italic => self.style_mut().italic = toggle(value),
            ControlWord::Underline => self.style_mut().underline = toggle(value),
            ControlWord::UnderlineNone => self.style_mut().underline = false,
            ControlWord::Strike => self.style_mut().strikethrough = toggle(value),
            ControlWord::VerticalAlign(valign) => self.style_mut().valign = valign,
            ControlWord::FontSize => {
                if let Some(size) = value {
                    self.style_mut().font_size = size;
                }
            },
            ControlWord::Foreground => {
                if let Some(color) = value {
                    self.style_mut().foreground = Some(color);
                }
            },
            ControlWord::Background => {
                if let Some(color) = value {
                    self.style_mut().background = Some(color);
                }
            },
            ControlWord::Plain => self.scopes[self.current].style.reset_character(&self.defaults),

            ControlWord::Pard => self.scopes[self.current].style = self.defaults.clone(),
            ControlWord::Par => return self.emit_paragraph(),
            ControlWord::Align(align) => self.style_mut().align = align,
            ControlWord::Indent => {
                if let Some(twips) = value {
                    self.style_mut().indent = twips;
                }
            },
            ControlWord::RightIndent => {
                if let Some(twips) = value {
                    self.style_mut().right_indent = twips;
                }
            },
            ControlWord::FirstLineIndent => {
                if let Some(twips) = value {
                    self.style_mut().first_line_indent = twips;
                }
            },
            ControlWord::SpaceBefore => {
                if let Some(twips) = value {
                    self.style_mut().space_before = twips;
                }
            },
            ControlWord::SpaceAfter => {
                if let Some(twips) = value {
                    self.style_mut().space_after = twips;
                }
            },

            ControlWord::Symbol(text) => return self.emit_text(text.to_string()),
            ControlWord::Unicode => {
                if let Some(code) = value {
                    return self.unicode(code);
                }
            },

            ControlWord::Margin(edge) => {
                if let Some(twips) = value {
                    let document = &mut self.document;
                    match edge {
                        Margin::Left => document.margin_left = twips,
                        Margin::Right => document.margin_right = twips,
                        Margin::Top => document.margin_top = twips,
                        Margin::Bottom => document.margin_bottom = twips,
                    }
                }
            },
        }
        Ok(())
    }

    /// The document scope is never ignorable.
    fn mark_ignorable(&mut self) {
        if self.current != ScopeId::ROOT {
            self.scopes[self.current].ignorable = Some(true);
        }
    }

    /// `\rtf`: a top-level group becomes the document itself.
    fn enter_document(&mut self) -> RtfResult<()> {
        let current = self.current;
        if self.scopes[current].parent != Some(ScopeId::ROOT) {
            return Ok(());
        }
        let scope = self.scopes.release(current);
        self.current = ScopeId::ROOT;
        for item in scope.content {
            self.add_content(ScopeId::ROOT, item)?;
        }
        Ok(())
    }

    /// Turn the current scope into a table destination.
    fn begin_table(&mut self, kind: ScopeKind) {
        if self.current == ScopeId::ROOT {
            self.diagnostics.error(
                DiagnosticKind::MalformedTable,
                format!("{} outside a group", kind.name()),
            );
            return;
        }
        self.scopes[self.current].become_kind(kind);
    }

    /// The current scope, or its parent, when it matches `accept`.
    fn nearby_kind(&mut self, accept: impl Fn(&ScopeKind) -> bool) -> Option<&mut ScopeKind> {
        let current = self.current;
        let target = if accept(&self.scopes[current].kind) {
            current
        } else {
            let parent = self.scopes[current].parent?;
            if !accept(&self.scopes[parent].kind) {
                return None;
            }
            parent
        };
        Some(&mut self.scopes[target].kind)
    }

    fn in_font_table(&self) -> bool {
        let scope = &self.scopes[self.current];
        scope.kind.is_font_table()
            || scope
                .parent
                .is_some_and(|parent| self.scopes[parent].kind.is_font_table())
    }

    /// Font being defined by the nearest font table.
    fn current_font(&mut self) -> Option<&mut Font> {
        let table = self.scopes.font_table(self.current)?;
        match &mut self.scopes[table].kind {
            ScopeKind::FontTable { fonts, current } => {
                let id = (*current)?;
                fonts.get_mut(id)
            },
            _ => None,
        }
    }

    /// Font being defined, only directly inside a font table entry.
    fn table_font(&mut self) -> Option<&mut Font> {
        if !self.in_font_table() {
            return None;
        }
        self.current_font()
    }

    /// `\f`: define a font inside a font table, select one elsewhere.
    fn select_font(&mut self, id: i32) {
        if !self.in_font_table() {
            self.style_mut().font = id;
            return;
        }
        let charset = self.scopes.resolve_charset(self.current);
        if let Some(table) = self.scopes.font_table(self.current)
            && let ScopeKind::FontTable { fonts, current } = &mut self.scopes[table].kind
        {
            fonts.insert(Font::new(id, charset));
            *current = Some(id);
        }
    }

    fn font_charset(&mut self, code: i32) {
        if !self.in_font_table() {
            return;
        }
        let Some(charset) = Charset::from_font_charset(code) else {
            self.diagnostics.error(
                DiagnosticKind::UnsupportedCharset,
                format!("font charset {} is not supported", code),
            );
            return;
        };
        if let Some(font) = self.current_font() {
            font.charset = charset;
        }
        // A font's own group decodes its name in the font's charset.
        let scope = &mut self.scopes[self.current];
        if !scope.kind.is_font_table() {
            scope.charset = Some(charset);
        }
    }

    fn list(&mut self) -> Option<&mut List> {
        match self.nearby_kind(|kind| matches!(kind, ScopeKind::List(_))) {
            Some(ScopeKind::List(list)) => Some(list),
            _ => None,
        }
    }

    fn list_level(&mut self) -> Option<&mut ListLevel> {
        match self.nearby_kind(|kind| matches!(kind, ScopeKind::ListLevel(_))) {
            Some(ScopeKind::ListLevel(level)) => Some(level),
            _ => None,
        }
    }

    fn list_override(&mut self) -> Option<&mut ListOverride> {
        match self.nearby_kind(|kind| matches!(kind, ScopeKind::ListOverride(_))) {
            Some(ScopeKind::ListOverride(entry)) => Some(entry),
            _ => None,
        }
    }

    fn set_level(&mut self, value: Option<i32>, apply: impl FnOnce(&mut ListLevel, i32)) {
        if let Some(value) = value
            && let Some(level) = self.list_level()
        {
            apply(level, value);
        }
    }
}

/// Toggle words: no parameter turns the property on, `0` turns it off.
#[inline]
fn toggle(value: Option<i32>) -> bool {
    value.is_none_or(|v| v != 0)
}

fn display_param(value: Option<i32>) -> String {
    value.map_or_else(|| "(none)".to_string(), |v| v.to_string())
}

/// Remove the pending spans from a scope's content.
fn take_spans(content: &mut Vec<Content>) -> Vec<Span> {
    std::mem::take(content)
        .into_iter()
        .filter_map(|item| match item {
            Content::Span(span) => Some(span),
            Content::Paragraph(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::style::{Alignment, StyleProperty, StyleValue, VerticalAlign};
    use crate::rtf::types::FontFamily;
    use proptest::prelude::*;

    fn run(commands: Vec<Command<'_>>) -> RtfDocument {
        Interpreter::run(commands, InterpreterOptions::default()).unwrap()
    }

    fn spans(result: &RtfDocument) -> Vec<&Span> {
        result
            .document()
            .paragraphs()
            .iter()
            .flat_map(|p| p.spans.iter())
            .collect()
    }

    #[test]
    fn test_end_to_end_document() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            Command::word("ansi"),
            GroupStart,
            Command::word("fonttbl"),
            GroupStart,
            Command::word_with("f", 0),
            Command::word("froman"),
            Command::text("Times;"),
            GroupEnd,
            GroupEnd,
            Command::word_with("f", 0),
            Command::word("b"),
            Command::text("Hello"),
            Command::word_with("b", 0),
            Command::text("World"),
            Command::word("par"),
            GroupEnd,
        ]);

        let document = result.document();
        let fonts = document.fonts().fonts();
        assert_eq!(fonts.len(), 1);
        assert_eq!(fonts[0].id, 0);
        assert_eq!(fonts[0].family, FontFamily::Roman);
        assert_eq!(fonts[0].name, "Times");
        assert_eq!(fonts[0].charset, Charset::Ascii);

        assert_eq!(document.paragraphs().len(), 1);
        let spans = &document.paragraphs()[0].spans;
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].value, "Hello");
        assert!(spans[0].style.bold);
        assert_eq!(spans[0].style.font, 0);
        assert_eq!(spans[1].value, "World");
        assert!(!spans[1].style.bold);
        assert_eq!(spans[1].style.font, 0);
    }

    #[test]
    fn test_child_inherits_then_diverges() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            Command::word("i"),
            GroupStart,
            Command::word("b"),
            Command::text("inner"),
            GroupEnd,
            Command::text("outer"),
            Command::word("par"),
            GroupEnd,
        ]);

        let spans = spans(&result);
        assert_eq!(spans[0].value, "inner");
        assert!(spans[0].style.bold && spans[0].style.italic);
        assert_eq!(spans[1].value, "outer");
        assert!(!spans[1].style.bold && spans[1].style.italic);
    }

    #[test]
    fn test_pard_restores_defaults() {
        let mut interpreter = Interpreter::new();
        for command in [
            Command::GroupStart,
            Command::word_with("rtf", 1),
            Command::word_with("deff", 2),
            Command::word("qc"),
            Command::word_with("li", 720),
            Command::word_with("fs", 40),
            Command::word("ul"),
            Command::word("pard"),
        ] {
            interpreter.write(command).unwrap();
        }

        let style = &interpreter.scopes[interpreter.current].style;
        let expected = Style {
            font: 2,
            ..Style::default()
        };
        for property in StyleProperty::ALL {
            assert_eq!(style.get(property), expected.get(property), "{:?}", property);
        }
    }

    #[test]
    fn test_plain_resets_character_formatting_only() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            Command::word("qr"),
            Command::word("b"),
            Command::word_with("fs", 32),
            Command::word_with("cf", 2),
            Command::word("plain"),
            Command::text("x"),
            Command::word("par"),
            GroupEnd,
        ]);

        let span = spans(&result)[0];
        assert!(!span.style.bold);
        assert_eq!(span.style.font_size, 24);
        assert_eq!(span.style.align, Alignment::Right);
        assert_eq!(span.style.foreground, Some(2));
    }

    #[test]
    fn test_second_font_table_replaces_first() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            GroupStart,
            Command::word("fonttbl"),
            Command::word_with("f", 0),
            Command::text("Arial;"),
            Command::word_with("f", 1),
            Command::text("Courier;"),
            GroupEnd,
            GroupStart,
            Command::word("fonttbl"),
            Command::word_with("f", 5),
            Command::word("fswiss"),
            Command::text("Helvetica;"),
            GroupEnd,
            GroupEnd,
        ]);

        let fonts = result.document().fonts();
        assert_eq!(fonts.len(), 1);
        assert_eq!(fonts.get(5).unwrap().name, "Helvetica");
        assert_eq!(fonts.get(5).unwrap().family, FontFamily::Swiss);
        assert!(fonts.get(0).is_none());
    }

    #[test]
    fn test_font_charset_and_pitch() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            Command::word("ansi"),
            GroupStart,
            Command::word("fonttbl"),
            GroupStart,
            Command::word_with("f", 1),
            Command::word("fnil"),
            Command::word_with("fcharset", 128),
            Command::word_with("fprq", 1),
            HexByte(0x82),
            HexByte(0x6c),
            HexByte(0x82),
            HexByte(0x72),
            Command::text(";"),
            GroupEnd,
            GroupStart,
            Command::word_with("f", 2),
            Command::text("Arial;"),
            GroupEnd,
            GroupEnd,
            GroupEnd,
        ]);

        let fonts = result.document().fonts();
        let japanese = fonts.get(1).unwrap();
        assert_eq!(japanese.charset, Charset::ShiftJis);
        assert_eq!(japanese.pitch, Some(1));
        assert_eq!(japanese.name, "ＭＳ");

        let arial = fonts.get(2).unwrap();
        assert_eq!(arial.charset, Charset::Ascii);
        assert_eq!(arial.name, "Arial");
    }

    #[test]
    fn test_unsupported_font_charset_is_reported() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            GroupStart,
            Command::word("fonttbl"),
            Command::word_with("f", 0),
            Command::word_with("fcharset", 3),
            Command::text("Odd;"),
            GroupEnd,
            GroupEnd,
        ]);

        assert!(result.diagnostics().contains(DiagnosticKind::UnsupportedCharset));
        assert_eq!(result.document().fonts().get(0).unwrap().charset, Charset::DEFAULT);
    }

    #[test]
    fn test_body_font_selection() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            Command::word_with("f", 3),
            Command::text("x"),
            GroupEnd,
        ]);
        assert_eq!(spans(&result)[0].style.font, 3);
        assert!(result.document().fonts().is_empty());
    }

    #[test]
    fn test_color_table() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            GroupStart,
            Command::word("colortbl"),
            Command::text(";"),
            Command::word_with("red", 255),
            Command::word_with("green", 0),
            Command::word_with("blue", 0),
            Command::text(";"),
            Command::word_with("red", 300),
            Command::word_with("blue", 128),
            Command::text("; "),
            GroupEnd,
            GroupEnd,
        ]);

        let colors = result.document().colors().colors();
        assert_eq!(
            colors,
            &[
                Color::new(0, 0, 0),
                Color::new(255, 0, 0),
                Color::new(255, 0, 128)
            ]
        );
        assert!(!result.diagnostics().has_errors());
    }

    #[test]
    fn test_color_table_rejects_stray_text() {
        use Command::*;
        let commands = vec![
            GroupStart,
            Command::word_with("rtf", 1),
            GroupStart,
            Command::word("colortbl"),
            Command::text("oops;"),
            GroupEnd,
            GroupEnd,
        ];

        let lenient = run(commands.clone());
        assert!(lenient.diagnostics().contains(DiagnosticKind::MalformedTable));
        assert_eq!(lenient.document().colors().len(), 1);

        let strict = Interpreter::run(commands, InterpreterOptions::new().with_strict(true));
        assert!(matches!(strict, Err(RtfError::MalformedTable(_))));
    }

    #[test]
    fn test_split_hex_decodes_as_one_character() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            Command::word("ansi"),
            Command::word_with("ansicpg", 932),
            HexByte(0x93),
            HexByte(0xfa),
            Command::word("par"),
            GroupEnd,
        ]);

        let spans = spans(&result);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].value, "日");
    }

    #[test]
    fn test_hex_uses_default_codepage() {
        use Command::*;
        let result = run(vec![GroupStart, HexByte(0xe9), GroupEnd]);
        assert_eq!(result.document().text(), "é\n");
    }

    #[test]
    fn test_unsupported_codepage_is_reported() {
        let result = run(vec![
            Command::GroupStart,
            Command::word_with("rtf", 1),
            Command::word_with("ansicpg", 1234),
            Command::GroupEnd,
        ]);
        assert!(result.diagnostics().contains(DiagnosticKind::UnsupportedCodepage));
    }

    #[test]
    fn test_unicode_negative_parameter() {
        let decode = |value: i32| {
            let result = run(vec![
                Command::GroupStart,
                Command::word_with("rtf", 1),
                Command::word_with("u", value),
                Command::GroupEnd,
            ]);
            result.document().text()
        };
        assert_eq!(decode(-3784), decode(61752));
        assert_eq!(decode(-3784), "\u{F138}\n");
    }

    #[test]
    fn test_unicode_surrogate_pairs() {
        let result = run(vec![
            Command::GroupStart,
            Command::word_with("rtf", 1),
            Command::word_with("u", -10179),
            Command::word_with("u", -8704),
            Command::word_with("u", 0xD83D),
            Command::text("x"),
            Command::GroupEnd,
        ]);
        assert_eq!(result.document().text(), "😀\u{FFFD}x\n");
    }

    #[test]
    fn test_ignorable_destination_is_dropped() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            GroupStart,
            Ignorable,
            Command::word("generator"),
            Command::text("Writer 1.0;"),
            GroupEnd,
            GroupStart,
            Command::word("info"),
            GroupStart,
            Command::word("title"),
            Command::text("Title"),
            GroupEnd,
            GroupEnd,
            Command::text("body"),
            Command::word("par"),
            GroupEnd,
        ]);

        assert_eq!(result.document().text(), "body\n");
        // Unknown words inside ignorable scopes are not reported.
        assert!(!result.diagnostics().contains(DiagnosticKind::UnknownControlWord));
    }

    #[test]
    fn test_unknown_control_word_reported() {
        let result = run(vec![
            Command::GroupStart,
            Command::word_with("rtf", 1),
            Command::word("viewkind"),
            Command::GroupEnd,
        ]);
        let entry = result.diagnostics().iter().next().unwrap();
        assert_eq!(entry.kind, DiagnosticKind::UnknownControlWord);
        assert!(!result.diagnostics().has_errors());
    }

    #[test]
    fn test_alignment_hoisting() {
        use Command::*;
        let shared = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            Command::word("qc"),
            Command::text("a"),
            Command::word("par"),
            Command::text("b"),
            Command::word("par"),
            GroupEnd,
        ]);
        assert_eq!(shared.document().style().align(), Some(Alignment::Center));

        let differing = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            Command::word("qc"),
            Command::text("a"),
            Command::word("par"),
            Command::word("qr"),
            Command::text("b"),
            Command::word("par"),
            GroupEnd,
        ]);
        let base = differing.document().style();
        assert_eq!(base.align(), None);
        assert_eq!(base.get(StyleProperty::Bold), Some(StyleValue::Bool(false)));
    }

    #[test]
    fn test_no_paragraphs_no_hoisting() {
        let result = run(vec![
            Command::GroupStart,
            Command::word_with("rtf", 1),
            Command::GroupEnd,
        ]);
        assert!(result.document().paragraphs().is_empty());
        assert!(result.document().style().is_empty());
    }

    #[test]
    fn test_missing_group_ends_still_complete() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            GroupStart,
            Command::word("colortbl"),
            Command::word_with("red", 10),
            Command::text(";"),
            GroupEnd,
            GroupStart,
            Command::word("b"),
            Command::text("unterminated"),
        ]);

        let document = result.document();
        assert_eq!(document.colors().len(), 1);
        assert_eq!(document.paragraphs().len(), 1);
        assert_eq!(document.paragraphs()[0].spans[0].value, "unterminated");
        assert!(document.paragraphs()[0].spans[0].style.bold);
    }

    #[test]
    fn test_unbalanced_group_end() {
        let commands = vec![
            Command::GroupStart,
            Command::word_with("rtf", 1),
            Command::GroupEnd,
            Command::GroupEnd,
        ];
        let lenient = run(commands.clone());
        assert!(lenient.diagnostics().contains(DiagnosticKind::UnbalancedGroup));

        let strict = Interpreter::run(commands, InterpreterOptions::new().with_strict(true));
        assert!(matches!(strict, Err(RtfError::UnbalancedGroup(_))));
    }

    #[test]
    fn test_unknown_command_kind() {
        use std::borrow::Cow;
        let commands = vec![Command::GroupStart, Command::Unknown(Cow::Borrowed("pict-data"))];

        let lenient = run(commands.clone());
        assert!(lenient.diagnostics().contains(DiagnosticKind::UnknownCommand));

        let strict = Interpreter::run(commands, InterpreterOptions::new().with_strict(true));
        assert!(matches!(strict, Err(RtfError::UnknownCommand(kind)) if kind == "pict-data"));
    }

    #[test]
    fn test_table_word_at_document_level_is_ignored() {
        let result = run(vec![
            Command::GroupStart,
            Command::word_with("rtf", 1),
            Command::word("fonttbl"),
            Command::text("text"),
            Command::GroupEnd,
        ]);
        assert!(result.diagnostics().contains(DiagnosticKind::MalformedTable));
        assert_eq!(result.document().text(), "text\n");
    }

    #[test]
    fn test_group_trace() {
        let result = Interpreter::run(
            vec![
                Command::GroupStart,
                Command::word_with("rtf", 1),
                Command::GroupStart,
                Command::GroupEnd,
                Command::GroupEnd,
            ],
            InterpreterOptions::new().with_group_trace(true),
        )
        .unwrap();
        assert!(result.diagnostics().contains(DiagnosticKind::GroupClosed));
    }

    #[test]
    fn test_list_tables() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            GroupStart,
            Ignorable,
            Command::word("listtable"),
            GroupStart,
            Command::word("list"),
            Command::word_with("listtemplateid", 100),
            Command::word("listhybrid"),
            GroupStart,
            Command::word("listlevel"),
            Command::word_with("levelnfc", 23),
            Command::word_with("leveljc", 0),
            Command::word_with("levelstartat", 1),
            GroupStart,
            Command::word_with("leveltext", "\u{1}\u{2022}"),
            GroupEnd,
            GroupStart,
            Command::word_with("levelnumbers", ""),
            GroupEnd,
            GroupEnd,
            GroupStart,
            Command::word("listlevel"),
            Command::word_with("levelnfc", 4),
            GroupEnd,
            Command::word_with("listid", 42),
            GroupEnd,
            GroupEnd,
            GroupStart,
            Ignorable,
            Command::word("listoverridetable"),
            GroupStart,
            Command::word("listoverride"),
            Command::word_with("listid", 42),
            Command::word_with("listoverridecount", 0),
            Command::word_with("ls", 1),
            GroupEnd,
            GroupEnd,
            Command::word_with("ls", 1),
            Command::word_with("ilvl", 0),
            Command::text("item"),
            Command::word("par"),
            GroupEnd,
        ]);

        let document = result.document();
        let list = document.lists().get(42).unwrap();
        assert_eq!(list.template_id, Some(100));
        assert!(list.hybrid);
        assert_eq!(list.level_count(), 2);
        let first = list.get_level(0).unwrap();
        assert!(first.is_bullet());
        assert_eq!(first.start_at, Some(1));
        assert_eq!(first.level_text.as_deref(), Some("\u{1}\u{2022}"));
        assert_eq!(first.level_numbers.as_deref(), Some(""));
        assert_eq!(list.get_level(1).unwrap().nfc, Some(4));

        let entry = document.override_lists().get(1).unwrap();
        assert_eq!(entry.list_id, Some(42));
        assert_eq!(entry.override_count, Some(0));

        let style = &document.paragraphs()[0].style;
        assert_eq!(style.list_override, Some(1));
        assert_eq!(style.list_level, Some(0));
    }

    #[test]
    fn test_paragraph_formatting_and_symbols() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            Command::word_with("margl", 1000),
            Command::word_with("margb", 500),
            Command::word_with("fi", -360),
            Command::word_with("li", 720),
            Command::word_with("ri", 100),
            Command::word_with("sb", 120),
            Command::word_with("sa", 240),
            Command::word("qj"),
            Command::word("super"),
            Command::text("a"),
            Command::word("tab"),
            Command::word("nosupersub"),
            Command::word("emdash"),
            Command::word("par"),
            GroupEnd,
        ]);

        let document = result.document();
        assert_eq!(document.margin_left(), 1000);
        assert_eq!(document.margin_right(), 1800);
        assert_eq!(document.margin_top(), 1440);
        assert_eq!(document.margin_bottom(), 500);

        let paragraph = &document.paragraphs()[0];
        assert_eq!(paragraph.text(), "a\t\u{2014}");
        assert_eq!(paragraph.style.first_line_indent, -360);
        assert_eq!(paragraph.style.indent, 720);
        assert_eq!(paragraph.style.right_indent, 100);
        assert_eq!(paragraph.style.space_before, 120);
        assert_eq!(paragraph.style.space_after, 240);
        assert_eq!(paragraph.style.align, Alignment::Justify);
        assert_eq!(paragraph.spans[0].style.valign, VerticalAlign::Super);
        assert_eq!(paragraph.spans[2].style.valign, VerticalAlign::Normal);
    }

    #[test]
    fn test_end_paragraph_command() {
        let result = run(vec![
            Command::GroupStart,
            Command::word_with("rtf", 1),
            Command::text("one"),
            Command::EndParagraph,
            Command::text("two"),
            Command::GroupEnd,
        ]);
        let paragraphs = result.document().paragraphs();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].text(), "one");
        assert_eq!(paragraphs[1].text(), "two");
    }

    #[test]
    fn test_content_before_rtf_word_is_kept() {
        let result = run(vec![
            Command::GroupStart,
            Command::text("lead "),
            Command::word_with("rtf", 1),
            Command::text("body"),
            Command::GroupEnd,
        ]);
        assert_eq!(result.document().text(), "lead body\n");
    }

    #[test]
    fn test_dos_codepage_hex() {
        let decode = |word: &'static str, byte: u8| {
            run(vec![
                Command::GroupStart,
                Command::word_with("rtf", 1),
                Command::word(word),
                Command::HexByte(byte),
                Command::word("par"),
                Command::GroupEnd,
            ])
            .document()
            .text()
        };
        assert_eq!(decode("pc", 0x82), "\u{e9}\n");
        assert_eq!(decode("pca", 0x90), "\u{c9}\n");
    }

    #[test]
    fn test_unsupported_codepage_keeps_previous_charset() {
        let result = run(vec![
            Command::GroupStart,
            Command::word_with("rtf", 1),
            Command::word_with("ansicpg", 1251),
            Command::word_with("ansicpg", 1234),
            Command::HexByte(0xC4),
            Command::word("par"),
            Command::GroupEnd,
        ]);
        assert!(result.diagnostics().contains(DiagnosticKind::UnsupportedCodepage));
        assert_eq!(result.document().text(), "\u{414}\n");
    }

    #[test]
    fn test_font_words_outside_font_table_are_ignored() {
        let result = run(vec![
            Command::GroupStart,
            Command::word_with("rtf", 1),
            Command::word_with("ansicpg", 1251),
            Command::word("froman"),
            Command::word_with("fcharset", 128),
            Command::word_with("fprq", 2),
            Command::HexByte(0xC4),
            Command::word("par"),
            Command::GroupEnd,
        ]);
        assert!(result.document().fonts().is_empty());
        assert!(!result.diagnostics().has_errors());
        assert_eq!(result.document().text(), "\u{414}\n");
    }

    #[test]
    fn test_nested_rtf_inside_ignorable_group() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            GroupStart,
            Ignorable,
            Command::word("foo"),
            GroupStart,
            Command::word_with("rtf", 1),
            Command::text("secret"),
            GroupEnd,
            GroupEnd,
            Command::text("visible"),
            Command::word("par"),
            GroupEnd,
        ]);
        assert_eq!(result.document().text(), "visible\n");
    }

    #[test]
    fn test_ignorable_mark_at_document_level() {
        use Command::*;
        let result = run(vec![
            GroupStart,
            Command::word_with("rtf", 1),
            Ignorable,
            Command::word("foo"),
            GroupStart,
            Command::text("inner"),
            GroupEnd,
            Command::text("x"),
            Command::word("par"),
            GroupEnd,
        ]);
        assert_eq!(result.document().text(), "innerx\n");
    }

    proptest! {
        #[test]
        fn prop_unicode_wraps_at_16_bits(code in 0i32..=0xFFFF) {
            let single = |value: i32| {
                run(vec![Command::GroupStart, Command::word_with("u", value), Command::GroupEnd])
                    .document()
                    .text()
            };
            prop_assert_eq!(single(code), single(code - 65536));
        }

        #[test]
        fn prop_children_inherit_unmodified_properties(
            bold in any::<bool>(),
            size in 1i32..200,
            indent in -2000i32..2000,
        ) {
            let mut interpreter = Interpreter::new();
            interpreter.write(Command::GroupStart).unwrap();
            interpreter.write(Command::word_with("b", i32::from(bold))).unwrap();
            interpreter.write(Command::word_with("fs", size)).unwrap();
            interpreter.write(Command::word_with("li", indent)).unwrap();
            let parent = interpreter.scopes[interpreter.current].style.clone();

            interpreter.write(Command::GroupStart).unwrap();
            interpreter.write(Command::word("i")).unwrap();
            let child = &interpreter.scopes[interpreter.current].style;

            for property in StyleProperty::ALL {
                if property != StyleProperty::Italic {
                    prop_assert_eq!(child.get(property), parent.get(property));
                }
            }
            prop_assert!(child.italic);
        }
    }
}
