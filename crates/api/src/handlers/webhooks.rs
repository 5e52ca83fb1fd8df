//! Provider webhook receiver.
//!
//! One logical handler serves every provider: the path names the
//! provider, the owning client parses the provider-specific payload,
//! and the shared terminal-guarded reconciliation applies the result.
//! The handler must stay fast and never calls back out to a provider.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

use synclip_core::reconcile::plan_patch;
use synclip_db::repositories::TaskRepo;
use synclip_providers::{ProviderError, ProviderId};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Header carrying the hex HMAC-SHA256 of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Acknowledgement payload. `applied: false` means the event was
/// recognized but changed nothing (duplicate terminal delivery, stale
/// progress) -- providers must treat that as success, not retry.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub applied: bool,
}

/// POST /api/v1/webhooks/{provider}
///
/// Correlates by the provider's own task id; an unknown id is a 404
/// and never creates a task. Terminal task states absorb every further
/// delivery.
pub async fn provider_webhook(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let provider: ProviderId = provider
        .parse()
        .map_err(|e: String| AppError::NotFound(e))?;

    if let Some(secret) = state.webhook_secret.as_deref() {
        verify_signature(secret, &body, &headers)?;
    }

    let payload: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON payload: {e}")))?;

    let client = state
        .registry
        .client(provider)
        .ok_or(ProviderError::Unavailable(provider))?;
    let event = client.parse_webhook(&payload)?;

    let task = TaskRepo::find_by_external_id(&state.pool, provider.as_str(), &event.external_task_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No task with external id {} for provider {provider}",
                event.external_task_id
            ))
        })?;

    let Some(patch) = plan_patch(task.status, task.progress, &event.status) else {
        // Duplicate terminal delivery or stale progress: acknowledge
        // without touching the row.
        tracing::info!(
            project_id = %task.project_id,
            provider = %provider,
            status = %task.status,
            "Webhook changed nothing, acknowledged as no-op",
        );
        return Ok(Json(DataResponse {
            data: WebhookAck { applied: false },
        }));
    };

    let applied = TaskRepo::apply_patch_if_not_terminal(&state.pool, task.id, &patch).await?;

    tracing::info!(
        project_id = %task.project_id,
        provider = %provider,
        status = %patch.status,
        progress = patch.progress,
        applied,
        "Webhook reconciled",
    );

    Ok(Json(DataResponse {
        data: WebhookAck { applied },
    }))
}

/// Verify the hex HMAC-SHA256 signature header against the raw body.
fn verify_signature(secret: &str, body: &[u8], headers: &HeaderMap) -> Result<(), AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing webhook signature".to_string()))?;

    let signature = hex::decode(signature)
        .map_err(|_| AppError::Unauthorized("Malformed webhook signature".to_string()))?;

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::InternalError(format!("Invalid webhook secret: {e}")))?;
    mac.update(body);
    mac.verify_slice(&signature)
        .map_err(|_| AppError::Unauthorized("Webhook signature mismatch".to_string()))
}
