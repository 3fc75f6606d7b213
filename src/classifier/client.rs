//! HTTP client for the classification endpoint

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::EntryClassifier;
use crate::config::settings::ClassifierSettings;
use crate::error::{LedgerError, LedgerResult};

/// Classifier reached over HTTP
///
/// The endpoint receives `{"description": text}` and answers with a JSON
/// guess. A failing endpoint may still answer with `{"error", "fallback"}`;
/// the fallback object is then returned in place of a guess.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpClassifier {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> LedgerResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Classifier(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    /// Build the client from settings; the key is optional
    pub fn from_settings(settings: &ClassifierSettings) -> LedgerResult<Self> {
        let endpoint = settings
            .endpoint
            .as_deref()
            .filter(|endpoint| !endpoint.trim().is_empty())
            .ok_or_else(|| {
                LedgerError::Config("classifier.endpoint is not configured".into())
            })?;
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.is_empty());

        Self::new(endpoint, api_key, Duration::from_secs(settings.timeout_secs))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl EntryClassifier for HttpClassifier {
    fn classify(&self, text: &str) -> LedgerResult<Value> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "description": text }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|e| LedgerError::Classifier(format!("request failed: {}", e)))?;
        let status = response.status();
        let body: Value = response
            .json()
            .map_err(|e| LedgerError::Classifier(format!("unreadable response: {}", e)))?;

        if status.is_success() {
            debug!("classifier answered");
            return Ok(body);
        }

        match body.get("fallback") {
            Some(fallback @ Value::Object(_)) => {
                let reason = body.get("error").and_then(Value::as_str).unwrap_or("unknown");
                warn!(status = %status, reason, "classifier failed, using its fallback guess");
                Ok(fallback.clone())
            }
            _ => Err(LedgerError::Classifier(format!(
                "endpoint returned {}",
                status
            ))),
        }
    }
}
