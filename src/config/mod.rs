//! Configuration module for bizledger
//!
//! Data-directory resolution and the persisted settings file.

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::{ClassifierSettings, GatewayBackend, GatewaySettings, Settings};
