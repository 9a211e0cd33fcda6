// Server heartbeat retrieval: per-server query + fleet fan-out

use futures_util::future::join_all;
use reqwest::{Client, StatusCode};
use tracing::warn;

use crate::config::AlertSourceConfig;
use crate::models::ServerHeartbeat;

#[derive(Debug, thiserror::Error)]
pub enum HeartbeatFetchError {
    #[error("heartbeat request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("heartbeat endpoint returned {status} for {server_id}")]
    Status {
        status: StatusCode,
        server_id: String,
    },
}

pub struct HeartbeatRepo {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    servers: Vec<String>,
}

impl HeartbeatRepo {
    pub fn new(client: Client, config: &AlertSourceConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            servers: config.servers.clone(),
        }
    }

    /// GET {base}/server/health/{id}.
    pub async fn fetch_server_health(
        &self,
        server_id: &str,
    ) -> Result<ServerHeartbeat, HeartbeatFetchError> {
        let url = format!("{}/server/health/{}", self.base_url, server_id);
        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HeartbeatFetchError::Status {
                status,
                server_id: server_id.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    /// Queries every configured server concurrently. Servers that fail to
    /// answer (not provisioned, down, bad response) are skipped, not fatal.
    pub async fn fetch_fleet_health(&self) -> Vec<ServerHeartbeat> {
        let results = join_all(self.servers.iter().map(|id| self.fetch_server_health(id))).await;

        let mut out = Vec::with_capacity(results.len());
        for (server_id, result) in self.servers.iter().zip(results) {
            match result {
                Ok(heartbeat) => out.push(heartbeat),
                Err(e) => {
                    warn!(error = %e, server_id = %server_id, "heartbeat query failed; skipping server")
                }
            }
        }
        out
    }
}
