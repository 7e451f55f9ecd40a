use std::io::{stdout, Write};
use std::process;
use tracing::{info, warn};
use xlit_core::config::{Command, EngineConfig, RunConfig};
use xlit_core::core::sign_table::SignTable;
use xlit_core::core::types::Inscription;
use xlit_core::frequency::{unique_elements, FrequencyTable};
use xlit_core::tabular::{self, Table};
use xlit_core::{logging, persistence, report, DecipherEngine, TableError};

const USAGE: &str = "\
Usage: indus_xlit [translate | unknown | decode TEXT] [OPTIONS]

Options:
  --dataset DIR        Input directory (default: dataset)
  --results DIR        Output directory (default: results)
  --signs FILE         Sign table file name (default: xlits.csv)
  --inscriptions FILE  Inscription file name (default: indus-inscriptions.csv)
  --snapshot PATH      Reuse a saved sign table, or save the built one there
  --full-random        Draw random symbols from the full phonetic alphabet
  --seed N             Seed for random symbol assignment
  --json               Also write decoded records as JSON lines";

fn main() {
    logging::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return;
    }

    let base = RunConfig {
        engine: EngineConfig::from_env(),
        ..RunConfig::default()
    };
    let (command, config) = match RunConfig::from_args(&args, base) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("[ERROR] {e}\n\n{USAGE}");
            process::exit(2);
        }
    };

    if let Err(e) = run(command, &config) {
        eprintln!("[ERROR] {e}");
        process::exit(1);
    }
}

fn run(command: Command, config: &RunConfig) -> Result<(), TableError> {
    let engine = DecipherEngine::new(load_table(config)?);
    let mut out = stdout().lock();

    match command {
        Command::Translate => translate(&engine, config, &mut out),
        Command::Unknown => {
            report::print_unknown(&mut out, &engine.table().unknown_signs())?;
            Ok(())
        }
        Command::Decode(text) => {
            match engine.decode(&Inscription::new("-", text)) {
                Ok(record) => {
                    writeln!(out, "description: {}", record.description)?;
                    writeln!(out, "regex:       {}", record.regex)?;
                    writeln!(out, "{}", record.random)?;
                    writeln!(out, "text:        {}", record.text)?;
                    writeln!(out, "canonized:   {}", record.canonized.unwrap_or_default())?;
                }
                Err(e) => writeln!(out, "could not decode: {e}")?,
            }
            Ok(())
        }
    }
}

/// Loads the snapshot when one is configured and present, otherwise builds
/// the table from the sign file (saving it to the snapshot path if set).
fn load_table(config: &RunConfig) -> Result<SignTable, TableError> {
    if let Some(path) = config.snapshot.as_deref().filter(|p| p.is_file()) {
        let table = persistence::load_from_disk(path)?;
        if table.full_random() != config.engine.full_random {
            warn!("snapshot randomization mode differs from the requested one, using the snapshot");
        }
        return Ok(table);
    }

    let records = Table::read(&config.signs_path())?.sign_records()?;
    let table = SignTable::build(records, &config.engine);
    info!(signs = table.len(), full_random = table.full_random(), "built sign table");

    if let Some(path) = &config.snapshot {
        persistence::save_to_disk(&table, path)?;
    }
    Ok(table)
}

fn translate(
    engine: &DecipherEngine,
    config: &RunConfig,
    out: &mut impl Write,
) -> Result<(), TableError> {
    let inscriptions = Table::read(&config.inscriptions_path())?.inscriptions()?;
    let corpus = engine.decode_corpus(&inscriptions);
    info!(
        decoded = corpus.records.len(),
        failed = corpus.stats.failed,
        "decoded corpus"
    );

    tabular::write_records(&config.translated_path(), &corpus.records)?;
    if config.json {
        let json_path = config.translated_path().with_extension("jsonl");
        tabular::write_records_json(&json_path, &corpus.records)?;
    }

    let (substrings, codepoints) = unique_elements(&corpus.records);
    info!(
        substrings = substrings.len(),
        codepoints = codepoints.len(),
        "collected unique elements"
    );
    let frequencies = FrequencyTable::from_records(&corpus.records);
    tabular::write_frequencies(&config.frequency_path(), &frequencies.rows())?;

    report::print_summary(out, &frequencies.summary())?;
    report::print_stats(out, &corpus.stats)?;
    Ok(())
}
