use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Mount `/lipsync` routes.
///
/// `/lipsync/quote` must register before the `{project_id}` capture so
/// the literal segment wins.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/lipsync",
            post(handlers::lipsync::submit_task).get(handlers::lipsync::list_tasks),
        )
        .route("/lipsync/quote", get(handlers::lipsync::quote))
        .route("/lipsync/{project_id}", get(handlers::lipsync::task_status))
}
