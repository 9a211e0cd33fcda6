// Alert retrieval from the external alert source (REST)

pub mod envelope;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::config::AlertSourceConfig;
use crate::models::AlertRecord;

pub use envelope::ParsedBatch;

/// One alert query failed.
#[derive(Debug, thiserror::Error)]
pub enum AlertFetchError {
    #[error("alert source request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("alert source returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Both alert queries failed; carries both underlying causes. Surfaced to
/// the caller for a manual retry, never retried here.
#[derive(Debug, thiserror::Error)]
#[error("both alert queries failed; unresolved: {unresolved}; resolved: {resolved}")]
pub struct TotalFetchFailure {
    pub unresolved: AlertFetchError,
    pub resolved: AlertFetchError,
}

/// Merged result of the two sub-fetches.
#[derive(Debug, Default)]
pub struct AlertBatch {
    pub records: Vec<AlertRecord>,
    /// Records dropped by the strict per-record parse, across both responses.
    pub skipped: u64,
}

pub struct AlertRepo {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AlertRepo {
    pub fn new(client: Client, config: &AlertSourceConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// GET {base}/alerts?resolved={bool}. Tolerant of the three response
    /// envelope shapes (bare array, or array under data/alerts/items);
    /// shape mismatch alone is never an error.
    pub async fn fetch_alerts(&self, resolved: bool) -> Result<ParsedBatch, AlertFetchError> {
        let url = format!("{}/alerts?resolved={}", self.base_url, resolved);
        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AlertFetchError::Status { status, body });
        }

        let value: serde_json::Value = response.json().await?;
        let batch = envelope::parse_batch(value);
        debug!(
            resolved,
            records = batch.records.len(),
            skipped = batch.skipped,
            "alert query complete"
        );
        Ok(batch)
    }

    /// Fetches unresolved and resolved records concurrently and merges them,
    /// unresolved first. One side failing degrades to an empty list for that
    /// side; both sides failing is a `TotalFetchFailure`.
    pub async fn fetch_all(&self) -> Result<AlertBatch, TotalFetchFailure> {
        let (unresolved, resolved) = tokio::join!(self.fetch_alerts(false), self.fetch_alerts(true));

        match (unresolved, resolved) {
            (Err(unresolved), Err(resolved)) => Err(TotalFetchFailure {
                unresolved,
                resolved,
            }),
            (unresolved, resolved) => {
                let mut batch = AlertBatch::default();
                for (query, result) in [("unresolved", unresolved), ("resolved", resolved)] {
                    match result {
                        Ok(parsed) => {
                            batch.skipped += parsed.skipped;
                            batch.records.extend(parsed.records);
                        }
                        Err(e) => {
                            warn!(error = %e, query, "alert query failed; continuing with the other")
                        }
                    }
                }
                Ok(batch)
            }
        }
    }
}
