//! Audit logging system for bizledger
//!
//! Records every successful create, update and delete on the ledger with
//! before/after values in an append-only JSONL file.
//!
//! An [`AuditEntry`] describes one operation on one record and is built up
//! from record snapshots; [`AuditLogger`] appends entries and reads them back.

mod diff;
mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
