//! Volatile gateway with failure injection
//!
//! Used for dry runs and for exercising the store's failure paths: any
//! operation can be made to fail globally, for the next `n` calls, or for a
//! specific table and operation.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use super::rows::{self, TableSet};
use super::table::{Record, Table};
use super::{Gateway, Operation};
use crate::error::{LedgerError, LedgerResult};

/// In-memory gateway
#[derive(Debug, Default)]
pub struct MemoryGateway {
    tables: RwLock<TableSet>,
    failing: AtomicBool,
    fail_next: AtomicUsize,
    fail_on: RwLock<HashSet<(Operation, Table)>>,
    calls: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail until switched off again
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make the next `count` operations fail
    pub fn fail_next(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    /// Make one kind of operation on one table fail until cleared
    pub fn fail_on(&self, operation: Operation, table: Table) {
        if let Ok(mut fail_on) = self.fail_on.write() {
            fail_on.insert((operation, table));
        }
    }

    /// Make every operation on a table fail until cleared
    pub fn fail_table(&self, table: Table) {
        for operation in Operation::ALL {
            self.fail_on(operation, table);
        }
    }

    /// Remove every injected failure
    pub fn clear_failures(&self) {
        self.set_failing(false);
        self.fail_next(0);
        if let Ok(mut fail_on) = self.fail_on.write() {
            fail_on.clear();
        }
    }

    /// Number of operations attempted so far, failed ones included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of rows currently stored in a table
    pub fn row_count(&self, table: Table) -> usize {
        self.tables.read().map(|t| t.len(table)).unwrap_or(0)
    }

    fn check(&self, operation: Operation, table: Table) -> LedgerResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let injected = self.failing.load(Ordering::SeqCst)
            || self
                .fail_next
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            || self
                .fail_on
                .read()
                .map(|fail_on| fail_on.contains(&(operation, table)))
                .unwrap_or(false);

        if injected {
            return Err(LedgerError::Gateway(format!(
                "simulated {} failure on {}",
                operation, table
            )));
        }
        Ok(())
    }

    fn write_lock(&self) -> LedgerResult<std::sync::RwLockWriteGuard<'_, TableSet>> {
        self.tables
            .write()
            .map_err(|e| LedgerError::Gateway(format!("Failed to acquire write lock: {}", e)))
    }
}

impl Gateway for MemoryGateway {
    fn insert<R: Record>(&self, draft: &R::Draft) -> LedgerResult<R> {
        self.check(Operation::Insert, R::TABLE)?;
        let mut tables = self.write_lock()?;
        rows::insert_row(tables.rows_mut(R::TABLE), draft)
    }

    fn update<R: Record>(&self, id: R::Id, patch: &R::Patch) -> LedgerResult<R> {
        self.check(Operation::Update, R::TABLE)?;
        let mut tables = self.write_lock()?;
        rows::update_row(tables.rows_mut(R::TABLE), id, patch)
    }

    fn delete<R: Record>(&self, id: R::Id) -> LedgerResult<bool> {
        self.check(Operation::Delete, R::TABLE)?;
        let mut tables = self.write_lock()?;
        rows::delete_row::<R>(tables.rows_mut(R::TABLE), id)
    }

    fn select_all<R: Record>(&self) -> LedgerResult<Vec<R>> {
        self.check(Operation::Select, R::TABLE)?;
        let tables = self
            .tables
            .read()
            .map_err(|e| LedgerError::Gateway(format!("Failed to acquire read lock: {}", e)))?;
        rows::select_rows(tables.rows(R::TABLE))
    }
}
