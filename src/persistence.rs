// File: src/persistence.rs
use crate::core::sign_table::SignTable;
use crate::error::TableError;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Saves a built sign table, random symbols included, so later runs render
/// the same random spellings.
pub fn save_to_disk(table: &SignTable, path: &Path) -> Result<(), TableError> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, table)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    info!(file = %path.display(), signs = table.len(), "saved sign table snapshot");
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<SignTable, TableError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let table: SignTable = bincode::deserialize_from(reader)?;
    info!(file = %path.display(), signs = table.len(), "loaded sign table snapshot");
    Ok(table)
}
