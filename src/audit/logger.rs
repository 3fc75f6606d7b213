//! Append-only JSONL audit log

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, LedgerResult};

use super::entry::AuditEntry;

/// Audit log file holding one JSON entry per line
#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_path: PathBuf,
}

fn io_error<'a>(context: &'static str, path: &'a Path) -> impl FnOnce(std::io::Error) -> LedgerError + 'a {
    move |e| LedgerError::Io(format!("{} {}: {}", context, path.display(), e))
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry as a single line
    ///
    /// The line is serialized before the file is touched, so a failed
    /// serialization never leaves a partial line behind.
    pub fn append(&self, entry: &AuditEntry) -> LedgerResult<()> {
        let mut line = serde_json::to_string(entry)
            .map_err(|e| LedgerError::Json(format!("Cannot encode audit entry: {}", e)))?;
        line.push('\n');

        if let Some(dir) = self.log_path.parent() {
            fs::create_dir_all(dir).map_err(io_error("Cannot create", dir))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(io_error("Cannot open", &self.log_path))?;
        file.write_all(line.as_bytes())
            .and_then(|()| file.flush())
            .map_err(io_error("Cannot append to", &self.log_path))
    }

    /// Every entry in the log, oldest first; a missing log has none
    pub fn entries(&self) -> LedgerResult<Vec<AuditEntry>> {
        let contents = match fs::read_to_string(&self.log_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("Cannot read", &self.log_path)(e)),
        };

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| {
                    LedgerError::Json(format!("Audit log line {} is malformed: {}", index + 1, e))
                })
            })
            .collect()
    }

    /// The last `count` entries, oldest first
    pub fn recent(&self, count: usize) -> LedgerResult<Vec<AuditEntry>> {
        let mut entries = self.entries()?;
        let skip = entries.len().saturating_sub(count);
        entries.drain(..skip);
        Ok(entries)
    }
}
