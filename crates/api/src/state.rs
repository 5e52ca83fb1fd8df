use std::sync::Arc;

use synclip_providers::ProviderRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: synclip_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Provider registry owning the configured provider clients.
    pub registry: Arc<ProviderRegistry>,
    /// Shared secret for webhook signature verification, when set.
    pub webhook_secret: Option<Arc<str>>,
}
