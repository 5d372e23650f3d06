//! Brace scopes and the arena that owns them.
//!
//! Scopes live in a slot arena and refer to their enclosing scope by
//! [`ScopeId`]. Ownership follows the interpreter's group stack: a scope is
//! allocated on group start and released on the matching group end. The
//! parent index is only used for lookups.

use super::charset::Charset;
use super::list::{List, ListLevel, ListOverride, ListOverrideTable, ListTable};
use super::style::Style;
use super::types::{ColorTable, Content, FontTable};
use std::ops::{Index, IndexMut};

/// Index of a scope in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ScopeId(usize);

impl ScopeId {
    /// The document scope, which is never released.
    pub(crate) const ROOT: ScopeId = ScopeId(0);
}

/// Role of a scope.
#[derive(Debug, Clone)]
pub(crate) enum ScopeKind {
    /// The document itself
    Document,
    /// Ordinary formatting group
    Plain,
    /// `\fonttbl`
    FontTable {
        fonts: FontTable,
        /// Number of the font being defined
        current: Option<i32>,
    },
    /// `\colortbl`
    ColorTable {
        colors: ColorTable,
        red: u8,
        green: u8,
        blue: u8,
    },
    /// `\listtable`
    ListTable(ListTable),
    /// `\list`
    List(List),
    /// `\listlevel`
    ListLevel(ListLevel),
    /// `\listoverridetable`
    ListOverrideTable(ListOverrideTable),
    /// `\listoverride`
    ListOverride(ListOverride),
}

impl ScopeKind {
    /// Fresh font table.
    pub(crate) fn font_table() -> Self {
        ScopeKind::FontTable {
            fonts: FontTable::new(),
            current: None,
        }
    }

    /// Fresh color table.
    pub(crate) fn color_table() -> Self {
        ScopeKind::ColorTable {
            colors: ColorTable::new(),
            red: 0,
            green: 0,
            blue: 0,
        }
    }

    /// Short name for traces.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            ScopeKind::Document => "document",
            ScopeKind::Plain => "group",
            ScopeKind::FontTable { .. } => "fonttbl",
            ScopeKind::ColorTable { .. } => "colortbl",
            ScopeKind::ListTable(_) => "listtable",
            ScopeKind::List(_) => "list",
            ScopeKind::ListLevel(_) => "listlevel",
            ScopeKind::ListOverrideTable(_) => "listoverridetable",
            ScopeKind::ListOverride(_) => "listoverride",
        }
    }

    #[inline]
    pub(crate) fn is_font_table(&self) -> bool {
        matches!(self, ScopeKind::FontTable { .. })
    }
}

/// A brace scope.
#[derive(Debug, Clone)]
pub(crate) struct Scope {
    /// Enclosing scope (lookup only)
    pub(crate) parent: Option<ScopeId>,
    /// Snapshot of the parent's style at creation, then local edits
    pub(crate) style: Style,
    /// Local charset; `None` defers to the parent chain
    pub(crate) charset: Option<Charset>,
    /// Local ignorable flag; `None` defers to the parent chain
    pub(crate) ignorable: Option<bool>,
    /// Accumulated content, folded into the parent on close
    pub(crate) content: Vec<Content>,
    pub(crate) kind: ScopeKind,
}

impl Scope {
    /// The document scope.
    pub(crate) fn root(style: Style, charset: Charset) -> Self {
        Self {
            parent: None,
            style,
            charset: Some(charset),
            ignorable: Some(false),
            content: Vec::new(),
            kind: ScopeKind::Document,
        }
    }

    /// A plain group inside `parent`, starting from a copy of its style.
    pub(crate) fn child(parent: ScopeId, style: Style) -> Self {
        Self {
            parent: Some(parent),
            style,
            charset: None,
            ignorable: None,
            content: Vec::new(),
            kind: ScopeKind::Plain,
        }
    }

    /// Turn this scope into a table destination.
    ///
    /// Content read so far and the local ignorable mark are dropped; the
    /// style and parent are kept.
    pub(crate) fn become_kind(&mut self, kind: ScopeKind) {
        self.kind = kind;
        self.content.clear();
        self.ignorable = None;
    }
}

/// Slot arena of scopes with slot reuse.
#[derive(Debug)]
pub(crate) struct ScopeArena {
    slots: Vec<Scope>,
    free: Vec<usize>,
}

impl ScopeArena {
    /// Create an arena holding only the document scope.
    pub(crate) fn new(root: Scope) -> Self {
        Self {
            slots: vec![root],
            free: Vec::new(),
        }
    }

    /// Store a scope and return its id.
    pub(crate) fn alloc(&mut self, scope: Scope) -> ScopeId {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = scope;
                ScopeId(slot)
            },
            None => {
                self.slots.push(scope);
                ScopeId(self.slots.len() - 1)
            },
        }
    }

    /// Take a closed scope out of the arena.
    ///
    /// The document scope is never released.
    pub(crate) fn release(&mut self, id: ScopeId) -> Scope {
        debug_assert_ne!(id, ScopeId::ROOT);
        let vacant = Scope::child(ScopeId::ROOT, Style::default());
        let scope = std::mem::replace(&mut self.slots[id.0], vacant);
        self.free.push(id.0);
        scope
    }

    /// `id` followed by each enclosing scope up to the document.
    pub(crate) fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(id), move |&id| self[id].parent)
    }

    /// Charset in effect for `id`, looked up through the parent chain.
    pub(crate) fn resolve_charset(&self, id: ScopeId) -> Charset {
        self.ancestors(id)
            .find_map(|id| self[id].charset)
            .unwrap_or_default()
    }

    /// Whether `id` or an enclosing scope is marked ignorable.
    pub(crate) fn is_ignorable(&self, id: ScopeId) -> bool {
        self.ancestors(id)
            .find_map(|id| self[id].ignorable)
            .unwrap_or(false)
    }

    /// Nearest font table scope, looked up through the parent chain.
    pub(crate) fn font_table(&self, id: ScopeId) -> Option<ScopeId> {
        self.ancestors(id).find(|&id| self[id].kind.is_font_table())
    }

    /// Number of live scopes, the document included.
    #[cfg(test)]
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

impl Index<ScopeId> for ScopeArena {
    type Output = Scope;

    #[inline]
    fn index(&self, id: ScopeId) -> &Scope {
        &self.slots[id.0]
    }
}

impl IndexMut<ScopeId> for ScopeArena {
    #[inline]
    fn index_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.slots[id.0]
    }
}
