// GET handlers: version, alert analytics, fleet heartbeats

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::warn;

use super::AppState;
use crate::models::Period;
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// An unknown period token fails Query extraction, which axum rejects as 400.
#[derive(Debug, Deserialize)]
pub(super) struct AnalyticsParams {
    #[serde(default)]
    period: Option<Period>,
}

/// GET /api/analytics/alerts?period=7d — fetches both alert sets and returns
/// the aggregated analytics. Total fetch failure maps to 502; the front-end
/// keeps its previous result and offers a manual retry.
pub(super) async fn alert_analytics_handler(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Response {
    let period = params
        .period
        .unwrap_or(state.config.analytics.default_period);

    match state.analytics.get_analytics(period).await {
        Ok(analytics) => axum::Json(analytics).into_response(),
        Err(e) => {
            warn!(error = %e, period = period.as_str(), "alert analytics fetch failed");
            (
                StatusCode::BAD_GATEWAY,
                axum::Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// GET /api/server/health — fleet heartbeat fan-out; unresponsive servers
/// are simply absent from the list.
pub(super) async fn fleet_health_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.heartbeats.fetch_fleet_health().await)
}
