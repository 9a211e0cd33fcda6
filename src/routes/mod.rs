// HTTP routes serving the dashboard front-end

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::heartbeat_repo::HeartbeatRepo;
use crate::service::AnalyticsService;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) analytics: Arc<AnalyticsService>,
    pub(crate) heartbeats: Arc<HeartbeatRepo>,
    pub(crate) config: AppConfig,
}

pub fn app(
    analytics: Arc<AnalyticsService>,
    heartbeats: Arc<HeartbeatRepo>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        analytics,
        heartbeats,
        config,
    };
    Router::new()
        .route("/", get(|| async { "Fleetboard analytics backend" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/analytics/alerts", get(http::alert_analytics_handler)) // GET /api/analytics/alerts?period=7d
        .route("/api/server/health", get(http::fleet_health_handler)) // GET /api/server/health
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
