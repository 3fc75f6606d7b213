//! bizledger - small-business cash flow, cost and debt ledger
//!
//! This library provides the core of the bizledger command-line tool. It
//! keeps three collections (cash-flow entries, operational costs and debts)
//! behind a fallible persistence gateway, links each installment-paying debt
//! to a derived operational cost, and turns free-text descriptions into
//! ledger entries through an external classifier.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Ledger records, drafts and patches
//! - `storage`: Persistence gateways (JSON files, memory, REST)
//! - `services`: The ledger store and its aggregates
//! - `classifier`: Smart entry from free text
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use bizledger::config::{paths::LedgerPaths, settings::Settings};
//! use bizledger::services::LedgerStore;
//! use bizledger::storage::ConfiguredGateway;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = LedgerStore::open(ConfiguredGateway::open(&paths, &settings)?)?;
//! ```

use std::sync::Once;

pub mod audit;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use error::{LedgerError, LedgerResult};

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber, once
///
/// The level comes from `RUST_LOG` and defaults to `bizledger=warn`.
/// Diagnostics go to stderr so command output stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("bizledger=warn"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
