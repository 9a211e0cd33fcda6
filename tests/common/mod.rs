// Shared test helpers

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use fleetboard::models::{AlertRecord, Severity};

pub fn ts(s: &str) -> DateTime<Utc> {
    s.parse().expect("valid RFC 3339 timestamp")
}

pub fn record(id: &str, source: &str, severity: Severity, created_at: &str) -> AlertRecord {
    AlertRecord {
        id: id.into(),
        source: source.into(),
        source_id: None,
        severity,
        message: None,
        resolved: false,
        resolved_at: None,
        created_at: ts(created_at),
    }
}

pub fn resolved_record(
    id: &str,
    source: &str,
    severity: Severity,
    created_at: &str,
    resolved_at: &str,
) -> AlertRecord {
    AlertRecord {
        resolved: true,
        resolved_at: Some(ts(resolved_at)),
        ..record(id, source, severity, created_at)
    }
}
