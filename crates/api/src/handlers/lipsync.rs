//! Handlers for the `/lipsync` resource: submission with provider
//! failover, poll-on-read status reconciliation, listing, and cost
//! quoting.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use synclip_core::error::CoreError;
use synclip_core::pricing::credit_cost;
use synclip_core::reconcile::plan_patch;
use synclip_core::request::{GenerationOptions, GenerationRequest, QualityTier};
use synclip_core::status::TaskStatus;
use synclip_db::models::task::{LipSyncTask, NewTask, TaskListQuery};
use synclip_db::repositories::TaskRepo;
use synclip_providers::{ProviderError, ProviderId};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/lipsync
///
/// Validate the request, quote its credit cost, submit through the
/// provider registry (sequential failover), and persist the accepted
/// task. Returns 201 with the stored task row; a total provider
/// failure surfaces as 502 with every provider's distinct reason.
pub async fn submit_task(
    State(state): State<AppState>,
    Json(input): Json<GenerationRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    input.validate_semantics()?;

    let credits = credit_cost(input.quality_tier, input.duration_secs, &input.options);

    let submission = state.registry.process_lip_sync(&input).await?;

    let task = TaskRepo::create(
        &state.pool,
        &NewTask {
            project_id: Uuid::new_v4(),
            provider: submission.provider.as_str().to_string(),
            external_task_id: submission.external_task_id,
            // The provider has already acknowledged the job, so the
            // stored lifecycle starts past pending.
            status: TaskStatus::Processing,
            estimated_time: submission.estimated_time,
            source_kind: input.source_kind.as_str().to_string(),
            quality_tier: input.quality_tier.as_str().to_string(),
            credits_charged: credits as i32,
        },
    )
    .await?;

    tracing::info!(
        project_id = %task.project_id,
        provider = %task.provider,
        credits,
        "Lip-sync task submitted",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

// ---------------------------------------------------------------------------
// Status (poll-on-read reconciliation)
// ---------------------------------------------------------------------------

/// Task record plus a transient-error note for responses where a live
/// status probe failed and the cached state was returned instead.
#[derive(Debug, Serialize)]
pub struct TaskStatusView {
    #[serde(flatten)]
    pub task: LipSyncTask,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transient_error: Option<String>,
}

/// GET /api/v1/lipsync/{project_id}
///
/// Terminal tasks are served from the store without contacting the
/// provider. Non-terminal tasks trigger a live status probe against
/// the owning provider; the result is applied through the shared
/// terminal-guarded reconciliation and the fresh record returned. A
/// probe transport failure returns the cached record with a
/// `transient_error` note -- it never fails the task.
pub async fn task_status(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> AppResult<Json<DataResponse<TaskStatusView>>> {
    let task = TaskRepo::find_by_project_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "LipSyncTask",
            id: project_id,
        }))?;

    // Terminal states are absorbing: the cache is the truth.
    if task.status.is_terminal() {
        return Ok(Json(DataResponse {
            data: TaskStatusView {
                task,
                transient_error: None,
            },
        }));
    }

    let Some(external_task_id) = task.external_task_id.clone() else {
        // No provider-side id to poll with; the webhook path will have
        // to move this task forward.
        return Ok(Json(DataResponse {
            data: TaskStatusView {
                task,
                transient_error: None,
            },
        }));
    };

    let provider: ProviderId = task
        .provider
        .parse()
        .map_err(|e: String| AppError::InternalError(e))?;

    match state.registry.get_task_status(provider, &external_task_id).await {
        Ok(normalized) => {
            if let Some(patch) = plan_patch(task.status, task.progress, &normalized) {
                let applied =
                    TaskRepo::apply_patch_if_not_terminal(&state.pool, task.id, &patch).await?;
                if !applied {
                    tracing::debug!(
                        project_id = %project_id,
                        "Poll result arrived after terminal state, ignored",
                    );
                }
            }
            // Re-read so the response reflects whichever writer won.
            let fresh = TaskRepo::find_by_project_id(&state.pool, project_id)
                .await?
                .unwrap_or(task);
            Ok(Json(DataResponse {
                data: TaskStatusView {
                    task: fresh,
                    transient_error: None,
                },
            }))
        }
        Err(ProviderError::StatusQuery { message, .. }) => {
            // A failed probe is not a failed task: fall back to the
            // last-known state.
            tracing::warn!(
                project_id = %project_id,
                provider = %provider,
                error = %message,
                "Status probe failed, returning cached state",
            );
            Ok(Json(DataResponse {
                data: TaskStatusView {
                    task,
                    transient_error: Some(message),
                },
            }))
        }
        Err(other) => Err(other.into()),
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /api/v1/lipsync
///
/// List recent tasks, newest first. Supports optional `status`,
/// `limit`, and `offset` query parameters.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<TaskListQuery>,
) -> AppResult<impl IntoResponse> {
    let tasks = TaskRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: tasks }))
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// Query parameters for a cost quote.
#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub quality_tier: QualityTier,
    pub duration_secs: u32,
    #[serde(default)]
    pub enhanced_audio: bool,
    #[serde(default)]
    pub cinematic_camera: bool,
    #[serde(default)]
    pub dynamic_lighting: bool,
}

/// Quote response payload.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub quality_tier: QualityTier,
    pub duration_secs: u32,
    pub credits: u32,
}

/// GET /api/v1/lipsync/quote
///
/// Pure cost quote; the same inputs always return the same integer, so
/// the caller can debit exactly what was quoted after submission.
pub async fn quote(Query(params): Query<QuoteParams>) -> AppResult<impl IntoResponse> {
    let options = GenerationOptions {
        enhanced_audio: params.enhanced_audio,
        cinematic_camera: params.cinematic_camera,
        dynamic_lighting: params.dynamic_lighting,
    };
    let credits = credit_cost(params.quality_tier, params.duration_secs, &options);

    Ok(Json(DataResponse {
        data: QuoteResponse {
            quality_tier: params.quality_tier,
            duration_secs: params.duration_secs,
            credits,
        },
    }))
}
