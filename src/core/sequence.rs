// src/core/sequence.rs
use crate::core::types::{sign_char, SignId, BREAK_SENTINEL};
use tracing::warn;

const BREAK_MARKER: char = '/';
const BREAK_PADDING: usize = 4;

/// Ordered sign ids of one inscription, left to right.
///
/// Parsed once and shared by the decoder (which walks it right to left) and
/// the canonicalizer (left to right).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignSequence {
    ids: Vec<SignId>,
}

impl SignSequence {
    /// Extracts every run of ASCII digits from `text`. Each `/` contributes
    /// four `999` sentinels so that break markers keep their positional
    /// width.
    pub fn parse(text: &str) -> Self {
        let mut ids = Vec::new();
        let mut run = String::new();

        for c in text.chars() {
            if c.is_ascii_digit() {
                run.push(c);
                continue;
            }
            Self::flush(&mut run, &mut ids);
            if c == BREAK_MARKER {
                ids.extend(std::iter::repeat(BREAK_SENTINEL).take(BREAK_PADDING));
            }
        }
        Self::flush(&mut run, &mut ids);

        Self { ids }
    }

    fn flush(run: &mut String, ids: &mut Vec<SignId>) {
        if run.is_empty() {
            return;
        }
        match run.parse::<SignId>() {
            Ok(id) if sign_char(id).is_some() => ids.push(id),
            _ => warn!(run = %run, "dropping sign id outside the private-use range"),
        }
        run.clear();
    }

    pub fn ids(&self) -> &[SignId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<Vec<SignId>> for SignSequence {
    fn from(ids: Vec<SignId>) -> Self {
        Self { ids }
    }
}
