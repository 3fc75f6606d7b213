//! User settings for bizledger
//!
//! Display preferences, the persistence backend and the entry classifier
//! endpoint. Every field has a default so older or hand-edited config files
//! keep loading.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;

/// Which gateway the store persists through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatewayBackend {
    /// JSON files in the data directory
    #[default]
    Json,
    /// Remote REST table service
    Rest,
}

/// Persistence gateway settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewaySettings {
    #[serde(default)]
    pub backend: GatewayBackend,

    /// Base URL of the REST service (rest backend only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Environment variable holding the REST API key
    #[serde(default = "default_gateway_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            backend: GatewayBackend::default(),
            url: None,
            api_key_env: default_gateway_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Entry classifier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// URL of the classification endpoint; smart entry is disabled without it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the endpoint's bearer key
    #[serde(default = "default_classifier_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key_env: default_classifier_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// User settings for bizledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Days ahead counted as "due soon" in the summary
    #[serde(default = "default_upcoming_window_days")]
    pub upcoming_window_days: u32,

    #[serde(default)]
    pub gateway: GatewaySettings,

    #[serde(default)]
    pub classifier: ClassifierSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "R$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_upcoming_window_days() -> u32 {
    30
}

fn default_gateway_key_env() -> String {
    "BIZLEDGER_GATEWAY_KEY".to_string()
}

fn default_classifier_key_env() -> String {
    "BIZLEDGER_CLASSIFIER_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            upcoming_window_days: default_upcoming_window_days(),
            gateway: GatewaySettings::default(),
            classifier: ClassifierSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Not persisted until the caller saves
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
