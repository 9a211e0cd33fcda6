// Alert fetcher tests: envelope normalization, strict record parsing, and
// the two-query merge against an in-process stub backend

use axum::{Json, Router, routing::get};
use fleetboard::alert_repo::{AlertRepo, envelope};
use fleetboard::config::AlertSourceConfig;
use fleetboard::models::Severity;
use serde_json::json;

fn source_config(base_url: String) -> AlertSourceConfig {
    AlertSourceConfig {
        base_url,
        api_key: None,
        timeout_ms: 2_000,
        servers: vec![],
    }
}

/// Serves `app` on an ephemeral local port and returns its base URL.
async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn valid_record(id: &str) -> serde_json::Value {
    json!({
        "alertId": id,
        "source": "vm",
        "severity": "critical",
        "resolved": false,
        "createdAt": "2024-03-14T08:00:00Z"
    })
}

#[test]
fn envelope_accepts_bare_array() {
    let batch = envelope::parse_batch(json!([valid_record("a1"), valid_record("a2")]));
    assert_eq!(batch.records.len(), 2);
    assert_eq!(batch.skipped, 0);
}

#[test]
fn envelope_accepts_nested_payload_keys() {
    for key in ["data", "alerts", "items"] {
        let batch = envelope::parse_batch(json!({ key: [valid_record("a1")] }));
        assert_eq!(batch.records.len(), 1, "payload under {key:?}");
    }
}

#[test]
fn envelope_prefers_first_matching_key() {
    // `data` is not an array here, so the payload is found under `alerts`.
    let batch = envelope::parse_batch(json!({
        "data": { "total": 1 },
        "alerts": [valid_record("a1")]
    }));
    assert_eq!(batch.records.len(), 1);
}

#[test]
fn envelope_unrecognized_shapes_normalize_to_empty() {
    for value in [
        json!("not a list"),
        json!(42),
        json!(null),
        json!({ "results": [valid_record("a1")] }),
    ] {
        let batch = envelope::parse_batch(value);
        assert!(batch.records.is_empty());
        assert_eq!(batch.skipped, 0);
    }
}

#[test]
fn malformed_records_are_dropped_and_counted() {
    let batch = envelope::parse_batch(json!([
        valid_record("a1"),
        { "alertId": "a2" },                      // missing required fields
        { "alertId": "a3", "source": "vm", "severity": "fatal",
          "resolved": false, "createdAt": "2024-03-14T08:00:00Z" }, // unknown severity
        { "alertId": "a4", "source": "vm", "severity": "info",
          "resolved": false, "createdAt": "yesterday" },            // bad timestamp
        "not even an object",
    ]));
    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.skipped, 4);
    assert_eq!(batch.records[0].id, "a1");
}

#[test]
fn malformed_resolved_at_keeps_record_without_resolution_date() {
    let batch = envelope::parse_batch(json!([{
        "alertId": "a1",
        "source": "vm",
        "severity": "warning",
        "resolved": true,
        "resolvedAt": "not-a-date",
        "createdAt": "2024-03-14T08:00:00Z"
    }]));
    assert_eq!(batch.skipped, 0);
    let record = &batch.records[0];
    assert!(record.resolved);
    assert!(record.resolved_at.is_none());
    assert!(record.resolution_instant().is_none());
}

#[test]
fn optional_fields_pass_through() {
    let batch = envelope::parse_batch(json!([{
        "alertId": "a1",
        "source": "uipath",
        "sourceId": "runner-3",
        "severity": "info",
        "message": "queue backlog cleared",
        "resolved": false,
        "createdAt": "2024-03-14T08:00:00Z"
    }]));
    let record = &batch.records[0];
    assert_eq!(record.source_id.as_deref(), Some("runner-3"));
    assert_eq!(record.message.as_deref(), Some("queue backlog cleared"));
    assert_eq!(record.severity, Severity::Info);
}

#[tokio::test]
async fn fetch_all_merges_unresolved_then_resolved() {
    let app = Router::new().route(
        "/alerts",
        get(
            |axum::extract::Query(q): axum::extract::Query<std::collections::HashMap<String, String>>| async move {
                if q.get("resolved").map(String::as_str) == Some("true") {
                    Json(json!({ "data": [
                        { "alertId": "r1", "source": "server", "severity": "info",
                          "resolved": true, "resolvedAt": "2024-03-14T10:00:00Z",
                          "createdAt": "2024-03-14T08:00:00Z" }
                    ]}))
                } else {
                    Json(json!([valid_record("u1"), valid_record("u2")]))
                }
            },
        ),
    );
    let base = spawn_upstream(app).await;
    let repo = AlertRepo::new(reqwest::Client::new(), &source_config(base));

    let batch = repo.fetch_all().await.expect("fetch_all");
    let ids: Vec<&str> = batch.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["u1", "u2", "r1"]);
    assert_eq!(batch.skipped, 0);
}

#[tokio::test]
async fn fetch_all_tolerates_one_side_failing() {
    let app = Router::new().route(
        "/alerts",
        get(
            |axum::extract::Query(q): axum::extract::Query<std::collections::HashMap<String, String>>| async move {
                if q.get("resolved").map(String::as_str) == Some("true") {
                    Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
                } else {
                    Ok(Json(json!([valid_record("u1")])))
                }
            },
        ),
    );
    let base = spawn_upstream(app).await;
    let repo = AlertRepo::new(reqwest::Client::new(), &source_config(base));

    let batch = repo.fetch_all().await.expect("partial failure tolerated");
    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.records[0].id, "u1");
}

#[tokio::test]
async fn fetch_all_fails_when_both_sides_fail() {
    let app = Router::new().route(
        "/alerts",
        get(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn_upstream(app).await;
    let repo = AlertRepo::new(reqwest::Client::new(), &source_config(base));

    let err = repo.fetch_all().await.expect_err("both queries failed");
    let message = err.to_string();
    assert!(message.contains("both alert queries failed"), "{message}");
}

#[tokio::test]
async fn fetch_all_fails_when_source_is_unreachable() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let repo = AlertRepo::new(
        reqwest::Client::new(),
        &source_config(format!("http://{addr}")),
    );
    assert!(repo.fetch_all().await.is_err());
}

#[tokio::test]
async fn api_key_header_is_forwarded() {
    let app = Router::new().route(
        "/alerts",
        get(|headers: axum::http::HeaderMap| async move {
            if headers.get("X-API-Key").and_then(|v| v.to_str().ok()) == Some("sekrit") {
                Json(json!([valid_record("a1")]))
            } else {
                Json(json!([]))
            }
        }),
    );
    let base = spawn_upstream(app).await;

    let config = AlertSourceConfig {
        api_key: Some("sekrit".into()),
        ..source_config(base)
    };
    let repo = AlertRepo::new(reqwest::Client::new(), &config);
    let batch = repo.fetch_alerts(false).await.expect("fetch");
    assert_eq!(batch.records.len(), 1);
}

#[tokio::test]
async fn non_array_envelope_from_live_source_is_empty_not_error() {
    let app = Router::new().route(
        "/alerts",
        get(|| async { Json(json!({ "message": "no alerts endpoint here" })) }),
    );
    let base = spawn_upstream(app).await;
    let repo = AlertRepo::new(reqwest::Client::new(), &source_config(base));

    let batch = repo.fetch_all().await.expect("shape mismatch is not an error");
    assert!(batch.records.is_empty());
}
