//! Remote table gateway
//!
//! Talks to a PostgREST-style endpoint (`/rest/v1/<table>`). Inserts and
//! updates ask for the stored row back (`Prefer: return=representation`) so
//! the store always mirrors what the remote side actually persisted.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::table::{id_key, Record, Table};
use super::Gateway;
use crate::config::settings::GatewaySettings;
use crate::error::{LedgerError, LedgerResult};

/// Gateway backed by a remote REST table service
#[derive(Debug, Clone)]
pub struct RestGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestGateway {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> LedgerResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Gateway(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Build the gateway from settings, reading the API key from the
    /// configured environment variable
    pub fn from_settings(settings: &GatewaySettings) -> LedgerResult<Self> {
        let url = settings
            .url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| LedgerError::Config("gateway.url is required for the rest backend".into()))?;

        let api_key = std::env::var(&settings.api_key_env).map_err(|_| {
            LedgerError::Config(format!(
                "environment variable {} is not set",
                settings.api_key_env
            ))
        })?;

        Self::new(url, api_key, Duration::from_secs(settings.timeout_secs))
    }

    pub fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    fn request(&self, method: Method, table: Table) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn send(&self, request: RequestBuilder, table: Table) -> LedgerResult<Response> {
        let response = request
            .send()
            .map_err(|e| LedgerError::Gateway(format!("{} request failed: {}", table, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(table = %table, status = %status, "gateway rejected request");
            return Err(LedgerError::Gateway(format!(
                "{} returned {}: {}",
                table,
                status,
                body.trim()
            )));
        }
        Ok(response)
    }

    fn rows<T: DeserializeOwned>(response: Response, table: Table) -> LedgerResult<Vec<T>> {
        response
            .json()
            .map_err(|e| LedgerError::Gateway(format!("unreadable {} response: {}", table, e)))
    }
}

impl Gateway for RestGateway {
    fn insert<R: Record>(&self, draft: &R::Draft) -> LedgerResult<R> {
        let table = R::TABLE;
        let request = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(draft);

        let rows: Vec<R> = Self::rows(self.send(request, table)?, table)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| LedgerError::Gateway(format!("{} insert returned no row", table)))?;
        debug!(table = %table, id = %row.id(), "inserted row");
        Ok(row)
    }

    fn update<R: Record>(&self, id: R::Id, patch: &R::Patch) -> LedgerResult<R> {
        let table = R::TABLE;
        let request = self
            .request(Method::PATCH, table)
            .query(&[("id", format!("eq.{}", id_key(&id)?))])
            .header("Prefer", "return=representation")
            .json(patch);

        let rows: Vec<R> = Self::rows(self.send(request, table)?, table)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| table.not_found(id.to_string()))
    }

    fn delete<R: Record>(&self, id: R::Id) -> LedgerResult<bool> {
        let table = R::TABLE;
        let request = self
            .request(Method::DELETE, table)
            .query(&[("id", format!("eq.{}", id_key(&id)?))])
            .header("Prefer", "return=representation");

        let rows: Vec<serde_json::Value> = Self::rows(self.send(request, table)?, table)?;
        Ok(!rows.is_empty())
    }

    fn select_all<R: Record>(&self) -> LedgerResult<Vec<R>> {
        let table = R::TABLE;
        let request = self
            .request(Method::GET, table)
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        Self::rows(self.send(request, table)?, table)
    }
}
