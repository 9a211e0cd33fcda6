// Analytics output: KPI scalars + chart series, recomputed on every fetch
// cycle and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Severity;

/// Requested time window token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "24h")]
    H24,
    #[serde(rename = "7d")]
    D7,
    #[serde(rename = "30d")]
    D30,
}

impl Period {
    /// Number of daily trend buckets for this period.
    pub fn trend_days(self) -> u64 {
        match self {
            Period::H24 => 1,
            Period::D7 => 7,
            Period::D30 => 30,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::H24 => "24h",
            Period::D7 => "7d",
            Period::D30 => "30d",
        }
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(Period::H24),
            "7d" => Ok(Period::D7),
            "30d" => Ok(Period::D30),
            other => anyhow::bail!("unknown period token: {other:?} (expected 24h, 7d or 30d)"),
        }
    }
}

/// `[start, end]` instant range derived from a period token. Both bounds are
/// inclusive for record filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Full analytics payload served to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertAnalytics {
    pub kpis: AlertKpis,
    pub charts: AlertCharts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertKpis {
    pub active_alerts: u64,
    pub critical_alerts: u64,
    pub warning_alerts: u64,
    /// Resolved-in-window / total-in-window x 100, one decimal. 0 when the
    /// window is empty.
    pub resolution_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCharts {
    pub alert_trend: Vec<TrendPoint>,
    pub severity_distribution: SeverityCounts,
    pub by_source: Vec<SourceBreakdown>,
}

/// One calendar day's counts. `created` and `resolved` are independent
/// counters: a record resolved on a later day contributes to each day
/// separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// UTC calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub created: u64,
    pub resolved: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCounts {
    pub critical: u64,
    pub warning: u64,
    pub info: u64,
}

impl SeverityCounts {
    pub fn bump(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.critical + self.warning + self.info
    }
}

/// Severity counts for one source group. Groups appear in first-seen order
/// of the filtered record set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceBreakdown {
    pub source: String,
    pub critical: u64,
    pub warning: u64,
    pub info: u64,
}
