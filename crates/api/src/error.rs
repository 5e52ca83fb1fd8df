use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use synclip_core::error::CoreError;
use synclip_providers::ProviderError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain error enums and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `synclip_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An error from the provider orchestration layer.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A missing resource with a human-readable message.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A rejected webhook signature.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Provider errors ---
            AppError::Provider(provider) => classify_provider_error(provider),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a provider error into an HTTP status, error code, and message.
///
/// The aggregate submission failure keeps every provider's distinct
/// reason in the message so the caller can tell "all providers down"
/// apart from "request invalid for every provider".
fn classify_provider_error(err: &ProviderError) -> (StatusCode, &'static str, String) {
    match err {
        ProviderError::AllProvidersFailed(_) => (
            StatusCode::BAD_GATEWAY,
            "ALL_PROVIDERS_FAILED",
            err.to_string(),
        ),
        ProviderError::Unavailable(provider) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "PROVIDER_UNAVAILABLE",
            format!("Provider {provider} is not configured"),
        ),
        ProviderError::NoProvidersConfigured => (
            StatusCode::SERVICE_UNAVAILABLE,
            "NO_PROVIDERS",
            err.to_string(),
        ),
        ProviderError::WebhookPayload { .. } => {
            (StatusCode::BAD_REQUEST, "BAD_WEBHOOK_PAYLOAD", err.to_string())
        }
        // Single-provider submission failures and status probes are
        // normally absorbed before reaching a response; if one does
        // surface, it is an upstream failure.
        ProviderError::Submission { .. } | ProviderError::StatusQuery { .. } => {
            (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", err.to_string())
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
