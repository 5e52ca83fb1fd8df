use std::collections::HashMap;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use synclip_providers::ProviderId;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Per-provider health. Diagnostic only; a provider probe failure
    /// shows up as `false` here, never as an error response.
    pub providers: HashMap<ProviderId, bool>,
}

/// GET /health -- returns service, database, and provider health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = synclip_db::health_check(&state.pool).await.is_ok();
    let providers = state.registry.providers_health().await;

    let status = if db_healthy && providers.values().any(|&h| h) {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        providers,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
