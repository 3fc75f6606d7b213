//! Storage initialization
//!
//! First-run setup for the file backend: directories plus an empty file per
//! table, so the data directory is complete before the first mutation.

use serde_json::Value;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

use super::file_io::write_json_atomic;
use super::table::Table;

/// Initialize storage for a fresh installation
///
/// Existing table files are left untouched. Returns the tables that were
/// created.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<Vec<Table>, LedgerError> {
    paths.ensure_directories()?;

    let mut created = Vec::new();
    for table in Table::ALL {
        let file = paths.table_file(table);
        if !file.exists() {
            write_json_atomic(&file, &Vec::<Value>::new())?;
            created.push(table);
        }
    }

    Ok(created)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.is_initialized() || Table::ALL.iter().any(|table| !paths.table_file(*table).exists())
}
