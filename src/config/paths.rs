//! Path management for bizledger
//!
//! ## Path Resolution Order
//!
//! 1. `BIZLEDGER_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory from `directories`
//!    (`~/.config/bizledger` on Linux, `%APPDATA%\bizledger\config` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::LedgerError;
use crate::storage::Table;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "BIZLEDGER_DATA_DIR";

/// Manages all paths used by bizledger
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    base_dir: PathBuf,
}

impl LedgerPaths {
    /// Resolve the base directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// override variable is not set.
    pub fn new() -> Result<Self, LedgerError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "bizledger")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    LedgerError::Config("Could not determine a home directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create LedgerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the table files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Path of the JSON file backing a table
    pub fn table_file(&self, table: Table) -> PathBuf {
        self.data_dir().join(table.file_name())
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LedgerError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if bizledger has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
