//! Repository for the `lipsync_tasks` table.
//!
//! The status-mutating path is a single conditional UPDATE guarded on
//! the stored status not being terminal, so concurrent webhook delivery
//! and poll-on-read reconciliation cannot overwrite a completed or
//! failed task. Callers learn whether their patch applied from the
//! returned bool.

use sqlx::PgPool;
use synclip_core::reconcile::StatusPatch;
use synclip_core::types::{DbId, ProjectId};

use crate::models::task::{LipSyncTask, NewTask, TaskListQuery};

/// Column list for `lipsync_tasks` queries.
const COLUMNS: &str = "\
    id, project_id, provider, external_task_id, status, progress, \
    result_url, error_message, estimated_time, source_kind, \
    quality_tier, credits_charged, created_at, updated_at";

/// Maximum page size for task listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for task listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides CRUD operations for lip-sync generation tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task row in the caller-chosen starting status.
    pub async fn create(pool: &PgPool, input: &NewTask) -> Result<LipSyncTask, sqlx::Error> {
        let query = format!(
            "INSERT INTO lipsync_tasks \
             (project_id, provider, external_task_id, status, estimated_time, \
              source_kind, quality_tier, credits_charged) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LipSyncTask>(&query)
            .bind(input.project_id)
            .bind(&input.provider)
            .bind(&input.external_task_id)
            .bind(input.status.as_str())
            .bind(&input.estimated_time)
            .bind(&input.source_kind)
            .bind(&input.quality_tier)
            .bind(input.credits_charged)
            .fetch_one(pool)
            .await
    }

    /// Look up a task by its stable project id.
    pub async fn find_by_project_id(
        pool: &PgPool,
        project_id: ProjectId,
    ) -> Result<Option<LipSyncTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lipsync_tasks WHERE project_id = $1");
        sqlx::query_as::<_, LipSyncTask>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Look up a task by the provider's own task id.
    ///
    /// This is the correlation path webhooks use; provider payloads do
    /// not know our project ids.
    pub async fn find_by_external_id(
        pool: &PgPool,
        provider: &str,
        external_task_id: &str,
    ) -> Result<Option<LipSyncTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lipsync_tasks \
             WHERE provider = $1 AND external_task_id = $2"
        );
        sqlx::query_as::<_, LipSyncTask>(&query)
            .bind(provider)
            .bind(external_task_id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically apply a reconciliation patch unless the stored status
    /// is already terminal.
    ///
    /// Returns whether the patch applied. A `false` on a terminal row is
    /// the expected outcome for duplicate terminal webhooks and stale
    /// polls, not an error.
    ///
    /// The terminal guard here is the `WHERE` clause, enforced by
    /// Postgres at execution time: even when two reconciliation paths
    /// race past the pure `plan_patch` check with the same stale read,
    /// only one terminalizing UPDATE can match the row. The pure half of
    /// the rule is covered by `synclip_core::reconcile` tests; this SQL
    /// half is only exercised against a live database.
    pub async fn apply_patch_if_not_terminal(
        pool: &PgPool,
        task_id: DbId,
        patch: &StatusPatch,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE lipsync_tasks \
             SET status = $2, \
                 progress = $3, \
                 result_url = COALESCE($4, result_url), \
                 error_message = COALESCE($5, error_message), \
                 updated_at = NOW() \
             WHERE id = $1 AND status NOT IN ('completed', 'failed')",
        )
        .bind(task_id)
        .bind(patch.status.as_str())
        .bind(patch.progress)
        .bind(patch.result_url.as_deref())
        .bind(patch.error_message.as_deref())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List recent tasks, newest first, with optional status filter.
    pub async fn list(
        pool: &PgPool,
        params: &TaskListQuery,
    ) -> Result<Vec<LipSyncTask>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        match params.status {
            Some(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM lipsync_tasks \
                     WHERE status = $1 \
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, LipSyncTask>(&query)
                    .bind(status.as_str())
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM lipsync_tasks \
                     ORDER BY created_at DESC LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, LipSyncTask>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }
}
