//! Lip-sync task entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use synclip_core::status::TaskStatus;
use synclip_core::types::{DbId, ProjectId, Timestamp};

/// A row from the `lipsync_tasks` table.
///
/// `provider` is the string tag of the provider that accepted the job;
/// a task stays bound to that provider for its whole lifetime.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LipSyncTask {
    pub id: DbId,
    pub project_id: ProjectId,
    pub provider: String,
    pub external_task_id: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    pub progress: i16,
    pub result_url: Option<String>,
    pub error_message: Option<String>,
    pub estimated_time: String,
    pub source_kind: String,
    pub quality_tier: String,
    pub credits_charged: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO for a freshly submitted task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: ProjectId,
    pub provider: String,
    pub external_task_id: String,
    /// Status the row starts in. A task persisted before provider
    /// acknowledgement starts `pending` (the schema default); the
    /// submission path persists after acceptance and records
    /// `processing` directly.
    pub status: TaskStatus,
    pub estimated_time: String,
    pub source_kind: String,
    pub quality_tier: String,
    pub credits_charged: i32,
}

/// Query parameters for task listing.
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    /// Filter by normalized status.
    pub status: Option<TaskStatus>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
