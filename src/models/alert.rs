// Alert record model (wire format shared with the dashboard front-end)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Three-level urgency classification. Closed set; unknown values fail the
/// record parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

/// One reported condition from the alert source.
///
/// `alertId`, `source`, `severity`, `resolved` and `createdAt` are required;
/// records missing any of them are dropped at the fetcher boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    #[serde(rename = "alertId")]
    pub id: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub resolved: bool,
    /// Only meaningful when `resolved` is true. Tolerant of absent,
    /// non-string, or unparseable values (all become None).
    #[serde(
        default,
        deserialize_with = "lenient_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AlertRecord {
    /// Resolution instant, counted only when the record is actually resolved.
    /// A record with `resolved=false` and a populated `resolvedAt` is still
    /// treated as unresolved.
    pub fn resolution_instant(&self) -> Option<DateTime<Utc>> {
        if self.resolved { self.resolved_at } else { None }
    }
}

/// A malformed `resolvedAt` must not drop the whole record; it only loses
/// its resolution date.
fn lenient_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}
