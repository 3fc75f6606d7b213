//! JSON file gateway
//!
//! Keeps each table in its own file under the data directory. Every
//! mutation works on a copy of the table, writes the copy to disk and only
//! then swaps it in, so a failed write leaves both disk and memory as they
//! were.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;
use tracing::debug;

use super::file_io::{read_json, write_json_atomic};
use super::rows::{self, TableSet};
use super::table::{Record, Table};
use super::Gateway;
use crate::error::{LedgerError, LedgerResult};

/// Gateway backed by one JSON file per table
#[derive(Debug)]
pub struct JsonGateway {
    data_dir: PathBuf,
    tables: RwLock<TableSet>,
}

impl JsonGateway {
    /// Open the gateway, loading every table file that exists
    pub fn open(data_dir: impl Into<PathBuf>) -> LedgerResult<Self> {
        let data_dir = data_dir.into();
        let mut tables = TableSet::new();

        for table in Table::ALL {
            let rows: Vec<Value> = read_json(data_dir.join(table.file_name()))?;
            debug!(table = %table, rows = rows.len(), "loaded table file");
            tables.replace(table, rows);
        }

        Ok(Self {
            data_dir,
            tables: RwLock::new(tables),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn table_file(&self, table: Table) -> PathBuf {
        self.data_dir.join(table.file_name())
    }

    fn mutate<T>(
        &self,
        table: Table,
        apply: impl FnOnce(&mut Vec<Value>) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| LedgerError::Gateway(format!("Failed to acquire write lock: {}", e)))?;

        let mut rows = tables.rows(table).to_vec();
        let result = apply(&mut rows)?;

        write_json_atomic(self.table_file(table), &rows)
            .map_err(|e| LedgerError::Gateway(format!("Failed to save {}: {}", table, e)))?;

        tables.replace(table, rows);
        Ok(result)
    }
}

impl Gateway for JsonGateway {
    fn insert<R: Record>(&self, draft: &R::Draft) -> LedgerResult<R> {
        self.mutate(R::TABLE, |rows| rows::insert_row(rows, draft))
    }

    fn update<R: Record>(&self, id: R::Id, patch: &R::Patch) -> LedgerResult<R> {
        self.mutate(R::TABLE, |rows| rows::update_row(rows, id, patch))
    }

    fn delete<R: Record>(&self, id: R::Id) -> LedgerResult<bool> {
        self.mutate(R::TABLE, |rows| rows::delete_row::<R>(rows, id))
    }

    fn select_all<R: Record>(&self) -> LedgerResult<Vec<R>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| LedgerError::Gateway(format!("Failed to acquire read lock: {}", e)))?;
        rows::select_rows(tables.rows(R::TABLE))
    }
}
