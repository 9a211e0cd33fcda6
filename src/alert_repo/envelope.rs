// Response envelope normalization + strict per-record parsing.
// The alert source may return a bare array or nest the payload under one of
// several conventional keys; anything else normalizes to an empty list.

use serde_json::Value;
use tracing::warn;

use crate::models::AlertRecord;

/// Keys the payload may be nested under when the response is an object.
const PAYLOAD_KEYS: [&str; 3] = ["data", "alerts", "items"];

/// Records parsed out of one response, plus the count of dropped ones.
#[derive(Debug, Default)]
pub struct ParsedBatch {
    pub records: Vec<AlertRecord>,
    pub skipped: u64,
}

/// Normalizes the envelope and parses records. A record failing
/// required-field checks is dropped and counted, never a hard error.
pub fn parse_batch(value: Value) -> ParsedBatch {
    let raw = extract_payload(value);
    let mut batch = ParsedBatch {
        records: Vec::with_capacity(raw.len()),
        skipped: 0,
    };
    for item in raw {
        match serde_json::from_value::<AlertRecord>(item) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                batch.skipped += 1;
                warn!(error = %e, "dropping malformed alert record");
            }
        }
    }
    batch
}

/// Bare array, or object with an array under data/alerts/items (first match
/// wins); anything else is an empty list.
fn extract_payload(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in PAYLOAD_KEYS {
                if let Some(Value::Array(items)) = map.remove(key) {
                    return items;
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}
