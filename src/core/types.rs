// src/core/types.rs
use serde::{Deserialize, Serialize};

/// Numeric identifier of a sign in the script catalogue.
pub type SignId = u32;

/// Sign `n` is rendered as the private-use scalar `PUA_BASE + n`.
pub const PUA_BASE: u32 = 0xE000;

/// Padding id written four times for every `/` break marker.
pub const BREAK_SENTINEL: SignId = 999;

/// Spelling used for signs whose phonetic value is unknown.
pub const PLACEHOLDER: &str = ".";

/// Private-use character for a sign id, if the offset stays inside Unicode.
pub fn sign_char(id: SignId) -> Option<char> {
    PUA_BASE.checked_add(id).and_then(char::from_u32)
}

/// `\uXXXX` escape of a codepoint, the form used in exported frequency rows.
pub fn escape_codepoint(c: char) -> String {
    format!("\\u{:04x}", c as u32)
}

/// `U+XXXX` notation used in reports.
pub fn display_codepoint(c: char) -> String {
    format!("U+{:04X}", c as u32)
}

/// Normalization target of a sign. Resolution is a single hop: the ids in
/// `Substitute` are emitted as-is even when they are not canonical themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Canonical {
    Itself,
    Substitute(Vec<SignId>),
    /// A non-self canonical was declared but left blank.
    Unresolved,
}

/// Metadata for a single sign. This is the "value" in the sign table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sign {
    pub id: SignId,
    /// Baseline phonetic unit, never empty.
    pub spelling: String,
    pub canonical: Canonical,
    /// Alternate unit for fuzzy search; equals `spelling` unless overridden.
    pub search_pattern: String,
    /// Drawn once when the table is built.
    pub random_symbol: String,
}

impl Sign {
    pub fn is_unknown(&self) -> bool {
        self.spelling == PLACEHOLDER
    }
}

/// One inscription row as read from the corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inscription {
    pub id: String,
    pub text: String,
    pub sanskrit: Option<String>,
    pub translation: Option<String>,
    pub text_length: usize,
    /// `Y` for complete inscriptions; any other non-empty value still marks
    /// the completeness as assessed.
    pub complete: Option<String>,
}

impl Inscription {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete.as_deref() == Some("Y")
    }
}

/// Output of decoding and canonizing one inscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedRecord {
    pub id: String,
    /// One private-use codepoint per sign, left to right.
    pub text: String,
    /// Codepoints after canonical substitution; `None` when a sign's
    /// canonical form could not be resolved.
    pub canonized: Option<String>,
    /// Hyphen-delimited spelling, left to right.
    pub description: String,
    pub random: String,
    pub regex: String,
    /// Sanskrit annotation, or `*` + description when there is none.
    pub reading: String,
}
