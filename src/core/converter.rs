// src/core/converter.rs
use crate::core::sequence::SignSequence;
use crate::core::sign_table::SignTable;
use crate::error::XlitError;
use tracing::warn;

const IMPLICIT_VOWEL: &str = "a";
const OPTIONAL_VOWEL: &str = "a?";
const SEPARATOR: char = '-';
const RANDOM_PREFIX: &str = "⚄ random: ";

/// Endings after which no implicit vowel is needed in the spelling.
const SPELLING_VOWEL_ENDINGS: &[&str] = &["i", "u", "an", "as"];
/// Per-sign endings for the random rendering, covering the extra vowels of
/// the full alphabet.
const RANDOM_VOWEL_ENDINGS: &[&str] = &["i", "u", "e", "o", "f", "F", "x", "X", "an", "as"];
/// Endings checked once at the end of the random rendering.
const RANDOM_TRAILING_ENDINGS: &[&str] = &["i", "u", "e", "o", "an", "as"];

/// The phonetic outputs for one inscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transliteration {
    /// Hyphen-delimited units, left to right.
    pub description: String,
    /// Concatenated units with `a?` wherever an implicit vowel was inserted.
    pub search_pattern: String,
    /// `⚄ random: ` followed by the random rendering, left to right.
    pub random: String,
}

impl Transliteration {
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.description.split(SEPARATOR).filter(|t| !t.is_empty())
    }
}

/// Turns sign sequences into phonetic spellings using a sign table.
pub struct Transliterator<'t> {
    table: &'t SignTable,
}

impl<'t> Transliterator<'t> {
    pub fn new(table: &'t SignTable) -> Self {
        Self { table }
    }

    /// Decodes `seq` starting from its rightmost sign.
    ///
    /// Each unit is appended after the accumulated text, so the implicit
    /// vowel of a sign is decided by looking at the sign to its left. The
    /// token order is reversed at the end to read left to right. Signs
    /// missing from the table are skipped, except the rightmost one, which
    /// fails the whole inscription.
    pub fn xlitize(&self, seq: &SignSequence) -> Result<Transliteration, XlitError> {
        let mut ids = seq.ids().iter().rev();
        let Some(&lead_id) = ids.next() else {
            return Ok(Transliteration::default());
        };
        let Some(lead) = self.table.get(lead_id) else {
            warn!(sign = lead_id, "missing sign");
            return Err(XlitError::MissingLeadSign(lead_id));
        };

        let full_random = self.table.full_random();
        let mut spelling = lead.spelling.clone();
        let mut pattern = lead.search_pattern.clone();
        let mut random = lead.random_symbol.clone();

        for &id in ids {
            let Some(sign) = self.table.get(id) else {
                warn!(sign = id, "missing sign");
                continue;
            };

            if needs_vowel(&spelling, &sign.spelling, SPELLING_VOWEL_ENDINGS) {
                spelling.push_str(IMPLICIT_VOWEL);
                pattern.push_str(OPTIONAL_VOWEL);
            }
            if !full_random && needs_vowel(&random, &sign.random_symbol, RANDOM_VOWEL_ENDINGS) {
                random.push_str(IMPLICIT_VOWEL);
            }

            spelling.push(SEPARATOR);
            spelling.push_str(&sign.spelling);
            random.push(SEPARATOR);
            random.push_str(&sign.random_symbol);
            pattern.push_str(&sign.search_pattern);
        }

        // No sign follows the leftmost one, so only its own ending matters.
        if !ends_with_any(&spelling, SPELLING_VOWEL_ENDINGS) {
            spelling.push_str(IMPLICIT_VOWEL);
            pattern.push_str(OPTIONAL_VOWEL);
        }
        if !full_random && !ends_with_any(&random, RANDOM_TRAILING_ENDINGS) {
            random.push_str(IMPLICIT_VOWEL);
        }

        Ok(Transliteration {
            description: reverse_tokens(&spelling),
            search_pattern: pattern,
            random: format!("{RANDOM_PREFIX}{}", reverse_tokens(&random)),
        })
    }
}

/// An implicit vowel goes between `acc` and `next` unless `acc` already
/// ends in a vowel sound or a placeholder, or `next` is a bare vowel.
pub fn needs_vowel(acc: &str, next: &str, endings: &[&str]) -> bool {
    !ends_with_any(acc, endings) && !is_bare_vowel(next) && !acc.ends_with('.')
}

fn ends_with_any(s: &str, endings: &[&str]) -> bool {
    endings.iter().any(|e| s.ends_with(e))
}

fn is_bare_vowel(unit: &str) -> bool {
    matches!(unit, "a" | "i" | "u")
}

pub(crate) fn reverse_tokens(s: &str) -> String {
    s.rsplit(SEPARATOR).collect::<Vec<_>>().join("-")
}
