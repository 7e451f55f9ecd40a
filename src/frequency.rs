// File: src/frequency.rs
use crate::core::types::{escape_codepoint, DecodedRecord};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// A description substring, split by whether it was paired with raw or
/// canonical codepoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrequencyKey {
    pub substring: String,
    pub canonical: bool,
}

/// One exported row: how often `substring` lined up with `codepoint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRow {
    pub substring: String,
    pub codepoint: char,
    pub frequency: u64,
    pub is_canonical: bool,
}

impl FrequencyRow {
    /// The codepoint as a `\uXXXX` escape.
    pub fn escaped(&self) -> String {
        escape_codepoint(self.codepoint)
    }
}

/// Totals for one substring variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSummary {
    pub total: u64,
    pub unique_glyphs: usize,
    pub most_frequent: char,
    pub most_frequent_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringSummary {
    pub substring: String,
    pub regular: Option<VariantSummary>,
    pub canonical: Option<VariantSummary>,
}

/// Substring → codepoint counts accumulated over a corpus.
///
/// Tables built over disjoint parts of a corpus can be combined with
/// [`FrequencyTable::merge`]; the result does not depend on merge order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<FrequencyKey, HashMap<char, u64>>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table over `records`, counting in parallel.
    pub fn from_records(records: &[DecodedRecord]) -> Self {
        records
            .par_iter()
            .fold(Self::new, |mut table, record| {
                table.observe(record);
                table
            })
            .reduce(Self::new, |mut a, b| {
                a.merge(b);
                a
            })
    }

    /// Pairs each description substring with the codepoint at the same
    /// position. Returns `false`, counting nothing, when the two do not line
    /// up.
    pub fn observe(&mut self, record: &DecodedRecord) -> bool {
        if record.text.is_empty() {
            debug!(id = %record.id, "empty inscription, nothing to count");
            return false;
        }
        let substrings: Vec<&str> = record.description.split('-').collect();
        let raw: Vec<char> = record.text.chars().collect();

        if substrings.len() != raw.len() {
            warn!(
                id = %record.id,
                substrings = substrings.len(),
                codepoints = raw.len(),
                "length mismatch, skipping record"
            );
            return false;
        }
        self.count(&substrings, &raw, false);

        if let Some(canonized) = &record.canonized {
            let canonical: Vec<char> = canonized.chars().collect();
            if canonical.len() == substrings.len() {
                self.count(&substrings, &canonical, true);
            } else {
                debug!(id = %record.id, "canonical form does not align, regular counts only");
            }
        }
        true
    }

    fn count(&mut self, substrings: &[&str], codepoints: &[char], canonical: bool) {
        for (substring, &codepoint) in substrings.iter().zip(codepoints) {
            if substring.is_empty() {
                continue;
            }
            let key = FrequencyKey {
                substring: substring.to_string(),
                canonical,
            };
            *self.counts.entry(key).or_default().entry(codepoint).or_insert(0) += 1;
        }
    }

    pub fn merge(&mut self, other: FrequencyTable) {
        for (key, codepoints) in other.counts {
            let entry = self.counts.entry(key).or_default();
            for (codepoint, n) in codepoints {
                *entry.entry(codepoint).or_insert(0) += n;
            }
        }
    }

    pub fn get(&self, substring: &str, canonical: bool, codepoint: char) -> u64 {
        let key = FrequencyKey {
            substring: substring.to_string(),
            canonical,
        };
        self.counts
            .get(&key)
            .and_then(|c| c.get(&codepoint))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Rows sorted by substring, regular before canonical, then by
    /// descending frequency with ties broken by ascending codepoint.
    pub fn rows(&self) -> Vec<FrequencyRow> {
        let mut rows: Vec<FrequencyRow> = self
            .counts
            .iter()
            .flat_map(|(key, codepoints)| {
                codepoints.iter().map(move |(&codepoint, &frequency)| FrequencyRow {
                    substring: key.substring.clone(),
                    codepoint,
                    frequency,
                    is_canonical: key.canonical,
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            a.substring
                .cmp(&b.substring)
                .then(a.is_canonical.cmp(&b.is_canonical))
                .then(b.frequency.cmp(&a.frequency))
                .then(a.codepoint.cmp(&b.codepoint))
        });
        rows
    }

    /// Per-substring totals, in substring order.
    pub fn summary(&self) -> Vec<SubstringSummary> {
        let mut summaries: Vec<SubstringSummary> = Vec::new();
        for row in self.rows() {
            if summaries.last().map(|s| &s.substring) != Some(&row.substring) {
                summaries.push(SubstringSummary {
                    substring: row.substring.clone(),
                    regular: None,
                    canonical: None,
                });
            }
            let Some(current) = summaries.last_mut() else {
                continue;
            };
            let slot = if row.is_canonical {
                &mut current.canonical
            } else {
                &mut current.regular
            };
            // Rows arrive most frequent first, so the first one seeds the slot.
            let variant = slot.get_or_insert(VariantSummary {
                total: 0,
                unique_glyphs: 0,
                most_frequent: row.codepoint,
                most_frequent_count: row.frequency,
            });
            variant.total += row.frequency;
            variant.unique_glyphs += 1;
        }
        summaries
    }
}

/// Distinct description substrings and raw codepoints seen in a corpus.
pub fn unique_elements(records: &[DecodedRecord]) -> (BTreeSet<String>, BTreeSet<char>) {
    let mut substrings = BTreeSet::new();
    let mut codepoints = BTreeSet::new();
    for record in records {
        substrings.extend(
            record
                .description
                .split('-')
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
        codepoints.extend(record.text.chars());
    }
    (substrings, codepoints)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, description: &str, text: &str, canonized: Option<&str>) -> DecodedRecord {
        DecodedRecord {
            id: id.to_string(),
            text: text.to_string(),
            canonized: canonized.map(str::to_string),
            description: description.to_string(),
            random: String::new(),
            regex: String::new(),
            reading: String::new(),
        }
    }

    #[test]
    fn aligned_record_counts_each_pair() {
        let mut table = FrequencyTable::new();
        assert!(table.observe(&record("1", "ka-ta", "\u{e001}\u{e002}", None)));
        assert_eq!(table.get("ka", false, '\u{e001}'), 1);
        assert_eq!(table.get("ta", false, '\u{e002}'), 1);
        assert_eq!(table.rows().len(), 2);
    }

    #[test]
    fn empty_record_counts_nothing() {
        let mut table = FrequencyTable::new();
        assert!(!table.observe(&record("1", "", "", Some(""))));
        assert!(table.is_empty());
    }

    #[test]
    fn mismatched_record_is_skipped() {
        let mut table = FrequencyTable::new();
        assert!(!table.observe(&record("1", "ka-ta-ma", "\u{e001}\u{e002}", None)));
        assert!(table.is_empty());
    }

    #[test]
    fn canonical_counts_are_kept_apart() {
        let mut table = FrequencyTable::new();
        table.observe(&record("1", "ka-ta", "\u{e001}\u{e005}", Some("\u{e001}\u{e002}")));
        assert_eq!(table.get("ta", false, '\u{e005}'), 1);
        assert_eq!(table.get("ta", true, '\u{e002}'), 1);
        assert_eq!(table.get("ta", true, '\u{e005}'), 0);

        // An expanded canonical form no longer lines up.
        let mut table = FrequencyTable::new();
        table.observe(&record("2", "ka", "\u{e007}", Some("\u{e001}\u{e002}")));
        assert_eq!(table.get("ka", false, '\u{e007}'), 1);
        assert!(table.rows().iter().all(|r| !r.is_canonical));
    }

    #[test]
    fn rows_are_sorted() {
        let mut table = FrequencyTable::new();
        for _ in 0..5 {
            table.observe(&record("a", "ka", "\u{e00b}", None));
            table.observe(&record("b", "ka", "\u{e00a}", None));
        }
        table.observe(&record("c", "ka", "\u{e009}", Some("\u{e001}")));
        table.observe(&record("d", "ba", "\u{e00c}", None));

        let got: Vec<(String, char, u64, bool)> = table
            .rows()
            .into_iter()
            .map(|r| (r.substring, r.codepoint, r.frequency, r.is_canonical))
            .collect();
        assert_eq!(
            got,
            vec![
                ("ba".to_string(), '\u{e00c}', 1, false),
                ("ka".to_string(), '\u{e00a}', 5, false),
                ("ka".to_string(), '\u{e00b}', 5, false),
                ("ka".to_string(), '\u{e009}', 1, false),
                ("ka".to_string(), '\u{e001}', 1, true),
            ]
        );
        assert_eq!(table.rows()[0].escaped(), "\\ue00c");
    }

    #[test]
    fn merge_matches_sequential_counting() {
        let records = vec![
            record("1", "ka-ta", "\u{e001}\u{e002}", Some("\u{e001}\u{e002}")),
            record("2", "ka", "\u{e003}", None),
            record("3", "ka-ta", "\u{e001}\u{e004}", None),
        ];
        let mut sequential = FrequencyTable::new();
        for r in &records {
            sequential.observe(r);
        }

        let mut left = FrequencyTable::new();
        left.observe(&records[2]);
        let mut right = FrequencyTable::new();
        right.observe(&records[0]);
        right.observe(&records[1]);
        left.merge(right);

        assert_eq!(left, sequential);
        assert_eq!(FrequencyTable::from_records(&records), sequential);
    }

    #[test]
    fn summary_reports_totals_and_top_glyph() {
        let mut table = FrequencyTable::new();
        table.observe(&record("1", "ka", "\u{e001}", Some("\u{e001}")));
        table.observe(&record("2", "ka", "\u{e002}", None));
        table.observe(&record("3", "ka", "\u{e002}", None));

        let summary = table.summary();
        assert_eq!(summary.len(), 1);
        let regular = summary[0].regular.as_ref().unwrap();
        assert_eq!(regular.total, 3);
        assert_eq!(regular.unique_glyphs, 2);
        assert_eq!(regular.most_frequent, '\u{e002}');
        assert_eq!(regular.most_frequent_count, 2);
        let canonical = summary[0].canonical.as_ref().unwrap();
        assert_eq!(canonical.total, 1);
    }

    #[test]
    fn unique_elements_collects_sets() {
        let records = vec![
            record("1", "ka-ta", "\u{e001}\u{e002}", None),
            record("2", "ka", "\u{e001}", None),
        ];
        let (substrings, codepoints) = unique_elements(&records);
        assert_eq!(substrings.len(), 2);
        assert_eq!(codepoints.len(), 2);
    }
}
