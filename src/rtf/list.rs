//! RTF list and numbering support.
//!
//! RTF uses a two-table system for bulleted and numbered lists: the list
//! table (`\listtable`) defines list templates with up to nine levels, and the
//! list override table (`\listoverridetable`) defines instances that
//! paragraphs reference through `\ls`.

use serde::Serialize;

/// List level type, decoded from a `\levelnfc` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListLevelType {
    /// Arabic numerals (1, 2, 3...)
    #[default]
    Decimal,
    /// Uppercase Roman numerals (I, II, III...)
    UpperRoman,
    /// Lowercase Roman numerals (i, ii, iii...)
    LowerRoman,
    /// Uppercase letters (A, B, C...)
    UpperLetter,
    /// Lowercase letters (a, b, c...)
    LowerLetter,
    /// Ordinal numbers (1st, 2nd, 3rd...)
    Ordinal,
    /// Cardinal text (One, Two, Three...)
    CardinalText,
    /// Ordinal text (First, Second, Third...)
    OrdinalText,
    /// Bullet (•, ○, ■, etc.)
    Bullet,
    /// No numbering
    None,
    /// Any other numbering format code
    Other(i32),
}

impl ListLevelType {
    /// Decode a `\levelnfc` numbering format code.
    pub const fn from_nfc(code: i32) -> Self {
        match code {
            0 => ListLevelType::Decimal,
            1 => ListLevelType::UpperRoman,
            2 => ListLevelType::LowerRoman,
            3 => ListLevelType::UpperLetter,
            4 => ListLevelType::LowerLetter,
            5 => ListLevelType::Ordinal,
            6 => ListLevelType::CardinalText,
            7 => ListLevelType::OrdinalText,
            23 => ListLevelType::Bullet,
            255 => ListLevelType::None,
            other => ListLevelType::Other(other),
        }
    }
}

/// List level justification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListJustification {
    /// Left-aligned
    #[default]
    Left,
    /// Centered
    Center,
    /// Right-aligned
    Right,
}

impl ListJustification {
    /// Decode a `\leveljc` code.
    pub const fn from_jc(code: i32) -> Self {
        match code {
            1 => ListJustification::Center,
            2 => ListJustification::Right,
            _ => ListJustification::Left,
        }
    }
}

/// A single level in a list (for multi-level lists)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLevel {
    /// Level number (0-8, where 0 is the top level)
    pub level: u8,
    /// Start value for numbering (`\levelstartat`)
    pub start_at: Option<i32>,
    /// Numbering format code (`\levelnfc`)
    pub nfc: Option<i32>,
    /// Numbering format code, Word 2000 form (`\levelnfcn`)
    pub nfcn: Option<i32>,
    /// Justification code (`\leveljc`)
    pub jc: Option<i32>,
    /// Justification code, Word 2000 form (`\leveljcn`)
    pub jcn: Option<i32>,
    /// Character following the number (`\levelfollow`): 0 tab, 1 space, 2 nothing
    pub follow: Option<i32>,
    /// Level text template (`\leveltext`)
    pub level_text: Option<String>,
    /// Placeholder offsets into the level text (`\levelnumbers`)
    pub level_numbers: Option<String>,
    /// Indentation for this level (in twips)
    pub indent: Option<i32>,
    /// Space after the number/bullet (in twips)
    pub space: Option<i32>,
}

impl ListLevel {
    /// Create a new list level
    #[inline]
    pub fn new(level: u8) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Level type, preferring the Word 2000 code when present.
    pub fn level_type(&self) -> ListLevelType {
        ListLevelType::from_nfc(self.nfcn.or(self.nfc).unwrap_or(0))
    }

    /// Justification, preferring the Word 2000 code when present.
    pub fn justification(&self) -> ListJustification {
        ListJustification::from_jc(self.jcn.or(self.jc).unwrap_or(0))
    }

    /// Check if this level is a bullet
    #[inline]
    pub fn is_bullet(&self) -> bool {
        matches!(self.level_type(), ListLevelType::Bullet)
    }
}

/// RTF list definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    /// Unique list identifier (`\listid`)
    pub id: Option<i32>,
    /// List template ID (`\listtemplateid`)
    pub template_id: Option<i32>,
    /// Whether this is a simple list (single level)
    pub simple: bool,
    /// Whether this is a hybrid list
    pub hybrid: bool,
    /// List levels (up to 9 levels)
    pub levels: Vec<ListLevel>,
}

impl List {
    /// Create a new list
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a level to the list
    #[inline]
    pub fn add_level(&mut self, level: ListLevel) {
        self.levels.push(level);
    }

    /// Get a level by index
    #[inline]
    pub fn get_level(&self, level: u8) -> Option<&ListLevel> {
        self.levels.iter().find(|l| l.level == level)
    }

    /// Get the number of levels
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

/// List override entry (instance of a list)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOverride {
    /// Original list ID this overrides (`\listid`)
    pub list_id: Option<i32>,
    /// Number of level overrides (`\listoverridecount`)
    pub override_count: Option<i32>,
    /// Override index referenced by paragraphs (`\ls`)
    pub ls: Option<i32>,
}

impl ListOverride {
    /// Create a new list override
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

/// List table containing all list definitions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ListTable {
    lists: Vec<List>,
}

impl ListTable {
    /// Create a new list table
    #[inline]
    pub fn new() -> Self {
        Self { lists: Vec::new() }
    }

    /// Add a list to the table
    #[inline]
    pub fn add(&mut self, list: List) {
        self.lists.push(list);
    }

    /// Get a list by ID
    #[inline]
    pub fn get(&self, id: i32) -> Option<&List> {
        self.lists.iter().find(|l| l.id == Some(id))
    }

    /// Get all lists
    #[inline]
    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    /// Number of lists.
    #[inline]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

/// List override table containing list instances
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ListOverrideTable {
    overrides: Vec<ListOverride>,
}

impl ListOverrideTable {
    /// Create a new list override table
    #[inline]
    pub fn new() -> Self {
        Self {
            overrides: Vec::new(),
        }
    }

    /// Add a list override
    #[inline]
    pub fn add(&mut self, override_entry: ListOverride) {
        self.overrides.push(override_entry);
    }

    /// Get a list override by its `\ls` index
    #[inline]
    pub fn get(&self, ls: i32) -> Option<&ListOverride> {
        self.overrides.iter().find(|o| o.ls == Some(ls))
    }

    /// Get all overrides
    #[inline]
    pub fn overrides(&self) -> &[ListOverride] {
        &self.overrides
    }

    /// Number of overrides.
    #[inline]
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
