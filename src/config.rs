use serde::Deserialize;

use crate::models::Period;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub alert_source: AlertSourceConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertSourceConfig {
    /// Base URL of the alert/heartbeat backend, e.g. "http://localhost:8000".
    pub base_url: String,
    /// Sent as X-API-Key on every request when set.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Server ids queried by the fleet heartbeat fan-out.
    #[serde(default)]
    pub servers: Vec<String>,
}

fn default_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Period used when the request doesn't name one.
    #[serde(default = "default_period")]
    pub default_period: Period,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_period: default_period(),
        }
    }
}

fn default_period() -> Period {
    Period::D7
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.alert_source.base_url.is_empty(),
            "alert_source.base_url must be non-empty"
        );
        anyhow::ensure!(
            self.alert_source.base_url.starts_with("http://")
                || self.alert_source.base_url.starts_with("https://"),
            "alert_source.base_url must be an http(s) URL, got {:?}",
            self.alert_source.base_url
        );
        anyhow::ensure!(
            self.alert_source.timeout_ms > 0,
            "alert_source.timeout_ms must be > 0, got {}",
            self.alert_source.timeout_ms
        );
        Ok(())
    }
}
