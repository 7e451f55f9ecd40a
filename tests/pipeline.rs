//! End-to-end corpus passes over files on disk.

use proptest::prelude::*;
use std::fs;
use xlit_core::config::EngineConfig;
use xlit_core::core::canon::Canonicalizer;
use xlit_core::core::converter::Transliterator;
use xlit_core::core::sequence::SignSequence;
use xlit_core::core::sign_table::{SignRecord, SignTable};
use xlit_core::frequency::FrequencyTable;
use xlit_core::tabular::{self, Table};
use xlit_core::{persistence, DecipherEngine};

const SIGNS: &str = "\
sign,xlit,canonical,regex
1,k,1,
2,t,2,t[h]?
3,i,1-3,
4,m,,
999,,999,
";

const INSCRIPTIONS: &str = "\
id,text,sanskrit,translation,text length,complete
M-1,1-2,,,2,Y
M-2,2-1,ka-ta,pot,2,Y
M-3,1/2,,,6,N
M-4,3-2,,,2,
M-5,4-1,,,2,
M-6,1-77,,,2,
";

fn seeded() -> EngineConfig {
    EngineConfig {
        full_random: false,
        seed: Some(11),
    }
}

#[test]
fn corpus_to_frequency_rows() {
    let dir = tempfile::tempdir().unwrap();
    let signs = dir.path().join("xlits.csv");
    let inscriptions = dir.path().join("indus-inscriptions.csv");
    fs::write(&signs, SIGNS).unwrap();
    fs::write(&inscriptions, INSCRIPTIONS).unwrap();

    let records = Table::read(&signs).unwrap().sign_records().unwrap();
    let engine = DecipherEngine::from_records(records, &seeded());
    let corpus = Table::read(&inscriptions).unwrap().inscriptions().unwrap();
    let report = engine.decode_corpus(&corpus);

    // M-6 ends in an unknown sign and cannot be decoded.
    assert_eq!(report.records.len(), 5);
    assert_eq!(report.stats.failed, 1);
    // M-5 uses sign 4, whose canonical form is blank.
    assert_eq!(report.stats.unresolved, 1);

    let m1 = &report.records[0];
    assert_eq!(m1.description, "ka-ta");
    assert_eq!(m1.regex, "t[h]?a?ka?");
    assert_eq!(m1.reading, "*ta-ka");
    assert_eq!(report.records[1].reading, "ka—ta");

    let m3 = &report.records[2];
    assert_eq!(m3.description.split('-').count(), 6);
    assert_eq!(m3.text.chars().count(), 6);

    let frequencies = FrequencyTable::from_records(&report.records);
    assert_eq!(frequencies.get("ka", false, '\u{e001}'), 4);
    assert_eq!(frequencies.get("ta", false, '\u{e002}'), 3);
    // M-4 expands sign 3 into two codepoints, so only its regular form counts.
    assert_eq!(frequencies.get("i", false, '\u{e003}'), 1);
    assert_eq!(frequencies.get("i", true, '\u{e003}'), 0);

    let out = dir.path().join("results").join("freq.csv");
    tabular::write_frequencies(&out, &frequencies.rows()).unwrap();
    let written = fs::read_to_string(&out).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("Substring,Unicode,Frequency,IsCanonical"));
    assert_eq!(lines.next(), Some(".,\\ue3e7,4,False"));

    let translated = dir.path().join("results").join("translated.csv");
    tabular::write_records(&translated, &report.records).unwrap();
    let back = Table::read(&translated).unwrap().inscriptions().unwrap();
    assert_eq!(back.len(), 5);
    assert_eq!(back[0].text, m1.text);
}

#[test]
fn snapshot_reproduces_random_renderings() {
    let dir = tempfile::tempdir().unwrap();
    let signs = Table::parse("xlits.csv", SIGNS).sign_records().unwrap();
    let table = SignTable::build(
        signs,
        &EngineConfig {
            full_random: false,
            seed: None,
        },
    );
    let path = dir.path().join("signs.bin");
    persistence::save_to_disk(&table, &path).unwrap();

    let seq = SignSequence::parse("1-2-3-4");
    let before = Transliterator::new(&table).xlitize(&seq).unwrap();
    let loaded = persistence::load_from_disk(&path).unwrap();
    let after = Transliterator::new(&loaded).xlitize(&seq).unwrap();
    assert_eq!(before, after);
}

fn consonant_table() -> SignTable {
    SignTable::build(
        (1..=20).map(|i| SignRecord::new(&i.to_string(), "k", None)),
        &seeded(),
    )
}

proptest! {
    #[test]
    fn token_count_matches_known_signs(
        body in prop::collection::vec(prop_oneof![1u32..=20, 100u32..=105], 0..30),
        lead in 1u32..=20,
    ) {
        let table = consonant_table();
        let mut ids = body;
        ids.push(lead);
        let known = ids.iter().filter(|&&id| table.contains(id)).count();

        let out = Transliterator::new(&table).xlitize(&SignSequence::from(ids)).unwrap();
        prop_assert_eq!(out.description.split('-').count(), known);
        prop_assert_eq!(out.tokens().count(), known);
    }

    #[test]
    fn self_canonical_input_is_idempotent(ids in prop::collection::vec(0u32..40, 0..30)) {
        let table = consonant_table();
        let seq = SignSequence::from(ids);
        let out = Canonicalizer::new(&table).canonize(&seq).unwrap();
        prop_assert_eq!(out.canonical, out.raw);
    }
}
