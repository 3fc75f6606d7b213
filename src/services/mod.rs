//! Service layer for bizledger
//!
//! The ledger store on top of a persistence gateway, and the aggregates
//! computed from it.

pub mod ledger;
pub mod summary;

pub use ledger::{DebtCreation, DebtDeletion, LedgerStore};
pub use summary::LedgerSummary;
