use crate::config::EngineConfig;
use crate::core::canon::Canonicalizer;
use crate::core::converter::{reverse_tokens, Transliterator};
use crate::core::sequence::SignSequence;
use crate::core::sign_table::{SignRecord, SignTable};
use crate::core::types::{DecodedRecord, Inscription};
use crate::error::XlitError;
use rayon::prelude::*;
use tracing::warn;

/// Completeness and decipherment counters over a corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorpusStats {
    /// Inscriptions whose completeness was assessed.
    pub assessed: usize,
    /// Summed text length of complete inscriptions.
    pub complete_length: usize,
    /// Inscriptions carrying a translation.
    pub translated: usize,
    /// Summed text length of complete inscriptions that carry a translation.
    pub translated_length: usize,
    /// Inscriptions that could not be decoded at all.
    pub failed: usize,
    /// Inscriptions with a blank canonical form on one of their signs.
    pub unresolved: usize,
}

/// Result of one pass over a corpus.
#[derive(Debug, Clone, Default)]
pub struct CorpusReport {
    /// Successfully decoded records, in input order.
    pub records: Vec<DecodedRecord>,
    pub stats: CorpusStats,
}

/// Per-run context: owns the sign table and runs every stage against it.
/// The table is read-only, so one engine may decode from many threads.
pub struct DecipherEngine {
    table: SignTable,
}

impl DecipherEngine {
    pub fn new(table: SignTable) -> Self {
        Self { table }
    }

    pub fn from_records(
        records: impl IntoIterator<Item = SignRecord>,
        config: &EngineConfig,
    ) -> Self {
        Self::new(SignTable::build(records, config))
    }

    pub fn table(&self) -> &SignTable {
        &self.table
    }

    /// Decodes and canonizes one inscription. The text is parsed once; both
    /// stages walk the same sequence.
    ///
    /// A blank canonical form does not fail the record: it is returned with
    /// `canonized` set to `None`.
    pub fn decode(&self, inscription: &Inscription) -> Result<DecodedRecord, XlitError> {
        let seq = SignSequence::parse(&inscription.text);
        let xlit = Transliterator::new(&self.table).xlitize(&seq)?;

        let (text, canonized) = match Canonicalizer::new(&self.table).canonize(&seq) {
            Ok(c) => (c.raw, Some(c.canonical)),
            Err(XlitError::UnresolvedCanonical(sign)) => {
                warn!(id = %inscription.id, sign, "no canonical form for inscription");
                (Canonicalizer::raw(&seq), None)
            }
            Err(e) => return Err(e),
        };

        let reading = match inscription.sanskrit.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.replace('-', "—"),
            // Unannotated readings are written right to left.
            _ => format!("*{}", reverse_tokens(&xlit.description)),
        };

        Ok(DecodedRecord {
            id: inscription.id.clone(),
            text,
            canonized,
            description: xlit.description,
            random: xlit.random,
            regex: xlit.search_pattern,
            reading,
        })
    }

    /// Decodes every inscription in parallel, preserving input order.
    /// Records that fail are logged and left out of `records`.
    pub fn decode_corpus(&self, inscriptions: &[Inscription]) -> CorpusReport {
        let results: Vec<Result<DecodedRecord, XlitError>> =
            inscriptions.par_iter().map(|i| self.decode(i)).collect();

        let mut report = CorpusReport::default();
        for (inscription, result) in inscriptions.iter().zip(results) {
            match result {
                Ok(record) => {
                    tally(&mut report.stats, inscription);
                    if record.canonized.is_none() {
                        report.stats.unresolved += 1;
                    }
                    report.records.push(record);
                }
                Err(e) => {
                    warn!(id = %inscription.id, error = %e, "skipping inscription");
                    report.stats.failed += 1;
                }
            }
        }
        report
    }
}

fn tally(stats: &mut CorpusStats, inscription: &Inscription) {
    let translated = inscription
        .translation
        .as_deref()
        .is_some_and(|t| !t.trim().is_empty());

    if inscription.complete.as_deref().is_some_and(|c| !c.is_empty()) {
        stats.assessed += 1;
    }
    if inscription.is_complete() {
        stats.complete_length += inscription.text_length;
        if translated {
            stats.translated_length += inscription.text_length;
        }
    }
    if translated {
        stats.translated += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> DecipherEngine {
        DecipherEngine::from_records(
            vec![
                SignRecord::new("1", "k", Some("1")),
                SignRecord::new("2", "i", Some("1-2")),
                SignRecord::new("3", "t", Some("")),
                SignRecord::new("999", "", None),
            ],
            &EngineConfig {
                full_random: false,
                seed: Some(3),
            },
        )
    }

    #[test]
    fn decodes_every_field() {
        let record = engine().decode(&Inscription::new("M-1", "1-2")).unwrap();
        assert_eq!(record.id, "M-1");
        assert_eq!(record.description, "ka-i");
        assert_eq!(record.regex, "ika?");
        assert_eq!(record.text, "\u{e001}\u{e002}");
        assert_eq!(record.canonized.as_deref(), Some("\u{e001}\u{e001}\u{e002}"));
        assert!(record.random.starts_with("⚄ random: "));
        assert_eq!(record.reading, "*i-ka");
    }

    #[test]
    fn sanskrit_annotation_becomes_the_reading() {
        let mut inscription = Inscription::new("M-2", "1");
        inscription.sanskrit = Some("ka-ra".to_string());
        let record = engine().decode(&inscription).unwrap();
        assert_eq!(record.reading, "ka—ra");
    }

    #[test]
    fn unresolved_canonical_keeps_the_record() {
        let record = engine().decode(&Inscription::new("M-3", "1-3")).unwrap();
        assert_eq!(record.canonized, None);
        assert_eq!(record.text.chars().count(), 2);
        assert_eq!(record.description, "ka-ta");
    }

    #[test]
    fn missing_lead_sign_fails_decoding() {
        let err = engine().decode(&Inscription::new("M-4", "1-42")).unwrap_err();
        assert_eq!(err, XlitError::MissingLeadSign(42));
    }

    #[test]
    fn break_marker_pads_with_placeholders() {
        let record = engine().decode(&Inscription::new("M-5", "1/1")).unwrap();
        assert_eq!(record.description.split('-').count(), 6);
        assert_eq!(record.text.chars().count(), 6);
    }

    #[test]
    fn corpus_pass_keeps_order_and_counts() {
        let mut complete = Inscription::new("a", "1");
        complete.complete = Some("Y".to_string());
        complete.text_length = 1;
        complete.translation = Some("pot".to_string());
        let mut partial = Inscription::new("b", "1-2");
        partial.complete = Some("N".to_string());
        partial.text_length = 2;

        // Undecodable inscriptions stay out of the totals.
        let mut undecodable = Inscription::new("c", "42");
        undecodable.complete = Some("Y".to_string());
        undecodable.text_length = 5;
        undecodable.translation = Some("seal".to_string());

        let corpus = vec![complete, partial, undecodable, Inscription::new("d", "3")];
        let report = engine().decode_corpus(&corpus);

        let ids: Vec<&str> = report.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "d"]);
        assert_eq!(
            report.stats,
            CorpusStats {
                assessed: 2,
                complete_length: 1,
                translated: 1,
                translated_length: 1,
                failed: 1,
                unresolved: 1,
            }
        );
    }
}
