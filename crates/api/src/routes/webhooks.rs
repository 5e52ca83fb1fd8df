use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Mount `/webhooks` routes. One logical handler serves every
/// provider; the path segment selects the payload parser.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/webhooks/{provider}",
        post(handlers::webhooks::provider_webhook),
    )
}
