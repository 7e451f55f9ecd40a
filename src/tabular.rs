//! Comma-separated input and output.
//!
//! Reading follows RFC 4180: a header row, fields optionally wrapped in
//! double quotes with `""` as an escaped quote, `\n` or `\r\n` line ends.
//! Writes go through a temporary file that is persisted over the target.

use crate::core::sign_table::SignRecord;
use crate::core::types::{DecodedRecord, Inscription};
use crate::error::TableError;
use crate::frequency::FrequencyRow;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

const BOM: char = '\u{feff}';

/// Header-keyed rows of one delimited file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn read(path: &Path) -> Result<Self, TableError> {
        let text = fs::read_to_string(path)?;
        let table = Self::parse(&path.display().to_string(), &text);
        info!(file = %path.display(), rows = table.rows.len(), "loaded table");
        Ok(table)
    }

    pub fn parse(name: &str, text: &str) -> Self {
        let mut records = parse_records(text.trim_start_matches(BOM)).into_iter();
        let headers = records
            .next()
            .map(|h| h.into_iter().map(|c| c.trim().to_string()).collect())
            .unwrap_or_default();
        Self {
            name: name.to_string(),
            headers,
            rows: records.collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn require(&self, column: &'static str) -> Result<usize, TableError> {
        self.column(column).ok_or_else(|| TableError::MissingColumn {
            file: self.name.clone(),
            column,
        })
    }

    /// Rows of a sign file: `sign`, `xlit`, and optionally `canonical`, `regex`.
    pub fn sign_records(&self) -> Result<Vec<SignRecord>, TableError> {
        let sign = self.require("sign")?;
        let xlit = self.require("xlit")?;
        let canonical = self.column("canonical");
        let regex = self.column("regex");

        Ok(self
            .rows
            .iter()
            .map(|row| SignRecord {
                sign: cell(row, sign).to_string(),
                xlit: cell(row, xlit).to_string(),
                canonical: canonical.map(|c| cell(row, c).to_string()),
                regex: regex.map(|c| cell(row, c).to_string()),
            })
            .collect())
    }

    /// Rows of an inscription file: `id`, `text`, plus optional annotations.
    pub fn inscriptions(&self) -> Result<Vec<Inscription>, TableError> {
        let id = self.require("id")?;
        let text = self.require("text")?;
        let sanskrit = self.column("sanskrit");
        let translation = self.column("translation");
        let length = self.column("text length");
        let complete = self.column("complete");

        Ok(self
            .rows
            .iter()
            .map(|row| Inscription {
                id: cell(row, id).to_string(),
                text: cell(row, text).to_string(),
                sanskrit: optional(row, sanskrit),
                translation: optional(row, translation),
                text_length: length
                    .and_then(|c| cell(row, c).trim().parse().ok())
                    .unwrap_or(0),
                complete: optional(row, complete),
            })
            .collect())
    }
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn optional(row: &[String], idx: Option<usize>) -> Option<String> {
    idx.map(|c| cell(row, c).trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                end_record(&mut records, &mut row);
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        end_record(&mut records, &mut row);
    }
    records
}

fn end_record(records: &mut Vec<Vec<String>>, row: &mut Vec<String>) {
    let row = std::mem::take(row);
    if !(row.len() == 1 && row[0].is_empty()) {
        records.push(row);
    }
}

/// Escapes a value for CSV output.
pub fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Atomically writes `headers` and `rows` to `path`, creating parent
/// directories as needed.
pub fn write_csv<I>(path: &Path, headers: &[&str], rows: I) -> Result<(), TableError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    write_atomic(path, |out| {
        writeln!(out, "{}", headers.join(","))?;
        for row in rows {
            let line: Vec<String> = row.iter().map(|v| csv_escape(v)).collect();
            writeln!(out, "{}", line.join(","))?;
        }
        Ok(())
    })
}

pub fn write_records(path: &Path, records: &[DecodedRecord]) -> Result<(), TableError> {
    let rows = records.iter().map(|r| {
        vec![
            r.id.clone(),
            r.text.clone(),
            r.canonized.clone().unwrap_or_default(),
            r.description.clone(),
            r.random.clone(),
            r.regex.clone(),
            r.reading.clone(),
        ]
    });
    write_csv(
        path,
        &["id", "text", "canonized", "description", "random", "regex", "reading"],
        rows,
    )
}

/// One JSON object per line.
pub fn write_records_json(path: &Path, records: &[DecodedRecord]) -> Result<(), TableError> {
    write_atomic(path, |out| {
        for record in records {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        }
        Ok(())
    })
}

pub fn write_frequencies(path: &Path, rows: &[FrequencyRow]) -> Result<(), TableError> {
    let rows = rows.iter().map(|r| {
        vec![
            r.substring.clone(),
            r.escaped(),
            r.frequency.to_string(),
            if r.is_canonical { "True" } else { "False" }.to_string(),
        ]
    });
    write_csv(path, &["Substring", "Unicode", "Frequency", "IsCanonical"], rows)
}

fn write_atomic<F>(path: &Path, body: F) -> Result<(), TableError>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<(), TableError>,
{
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        body(&mut writer)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;
    info!(file = %path.display(), "wrote table");
    Ok(())
}
