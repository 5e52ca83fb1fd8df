pub mod health;
pub mod lipsync;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /lipsync                      submit (POST), list (GET)
/// /lipsync/quote                cost quote (GET)
/// /lipsync/{project_id}         status with poll-on-read (GET)
///
/// /webhooks/{provider}          provider status push (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(lipsync::router())
        .merge(webhooks::router())
}
