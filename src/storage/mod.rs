//! Persistence gateways for bizledger
//!
//! The ledger store talks to its backend only through [`Gateway`]: insert
//! one row, update a row by id, delete a row by id and select all rows
//! newest first. Any of those calls may fail; the store treats every
//! failure as recoverable.
//!
//! Three backends are provided:
//!
//! - [`JsonGateway`]: one JSON file per table, written atomically (default)
//! - [`MemoryGateway`]: volatile tables with failure injection
//! - [`RestGateway`]: a remote PostgREST-style table service

pub mod file_io;
pub mod init;
pub mod json;
pub mod memory;
pub mod rest;
pub mod rows;
pub mod table;

use std::fmt;

pub use file_io::{read_json, write_json_atomic};
pub use init::{initialize_storage, needs_initialization};
pub use json::JsonGateway;
pub use memory::MemoryGateway;
pub use rest::RestGateway;
pub use table::{Record, Table};

use crate::config::paths::LedgerPaths;
use crate::config::settings::{GatewayBackend, Settings};
use crate::error::LedgerResult;

/// A fallible tabular backend
pub trait Gateway {
    /// Insert a row and return it as stored, with its assigned id and
    /// creation time
    fn insert<R: Record>(&self, draft: &R::Draft) -> LedgerResult<R>;

    /// Apply a partial update and return the stored row
    fn update<R: Record>(&self, id: R::Id, patch: &R::Patch) -> LedgerResult<R>;

    /// Delete a row, returning whether it existed
    fn delete<R: Record>(&self, id: R::Id) -> LedgerResult<bool>;

    /// Every row of the table, ordered by creation time descending
    fn select_all<R: Record>(&self) -> LedgerResult<Vec<R>>;
}

impl<G: Gateway> Gateway for &G {
    fn insert<R: Record>(&self, draft: &R::Draft) -> LedgerResult<R> {
        (**self).insert(draft)
    }

    fn update<R: Record>(&self, id: R::Id, patch: &R::Patch) -> LedgerResult<R> {
        (**self).update(id, patch)
    }

    fn delete<R: Record>(&self, id: R::Id) -> LedgerResult<bool> {
        (**self).delete::<R>(id)
    }

    fn select_all<R: Record>(&self) -> LedgerResult<Vec<R>> {
        (**self).select_all()
    }
}

/// The kinds of gateway call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Insert,
    Update,
    Delete,
    Select,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Insert,
        Operation::Update,
        Operation::Delete,
        Operation::Select,
    ];
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "insert"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Select => write!(f, "select"),
        }
    }
}

/// The backend selected in the settings file
#[derive(Debug)]
pub enum ConfiguredGateway {
    Json(JsonGateway),
    Rest(RestGateway),
}

impl ConfiguredGateway {
    /// Open the backend named by `settings.gateway.backend`
    pub fn open(paths: &LedgerPaths, settings: &Settings) -> LedgerResult<Self> {
        match settings.gateway.backend {
            GatewayBackend::Json => {
                paths.ensure_directories()?;
                Ok(Self::Json(JsonGateway::open(paths.data_dir())?))
            }
            GatewayBackend::Rest => Ok(Self::Rest(RestGateway::from_settings(&settings.gateway)?)),
        }
    }
}

impl Gateway for ConfiguredGateway {
    fn insert<R: Record>(&self, draft: &R::Draft) -> LedgerResult<R> {
        match self {
            Self::Json(gateway) => gateway.insert(draft),
            Self::Rest(gateway) => gateway.insert(draft),
        }
    }

    fn update<R: Record>(&self, id: R::Id, patch: &R::Patch) -> LedgerResult<R> {
        match self {
            Self::Json(gateway) => gateway.update(id, patch),
            Self::Rest(gateway) => gateway.update(id, patch),
        }
    }

    fn delete<R: Record>(&self, id: R::Id) -> LedgerResult<bool> {
        match self {
            Self::Json(gateway) => gateway.delete::<R>(id),
            Self::Rest(gateway) => gateway.delete::<R>(id),
        }
    }

    fn select_all<R: Record>(&self) -> LedgerResult<Vec<R>> {
        match self {
            Self::Json(gateway) => gateway.select_all(),
            Self::Rest(gateway) => gateway.select_all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_backend_is_json() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let gateway = ConfiguredGateway::open(&paths, &Settings::default()).unwrap();
        assert!(matches!(gateway, ConfiguredGateway::Json(_)));
        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_rest_backend_requires_url() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.gateway.backend = GatewayBackend::Rest;
        settings.gateway.url = None;

        let err = ConfiguredGateway::open(&paths, &settings).unwrap_err();
        assert!(matches!(err, crate::error::LedgerError::Config(_)));
    }
}
