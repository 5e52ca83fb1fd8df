//! Terminal-guarded status reconciliation.
//!
//! Two independent paths write provider-reported state onto a stored
//! task: the provider webhook receiver (push) and the poll-on-read
//! status query (pull). Both converge on [`plan_patch`] so the
//! absorption and idempotency rules are enforced in exactly one place;
//! the database layer re-applies the same terminal guard inside the
//! conditional UPDATE so an interleaved writer cannot slip past it.
//!
//! Rules:
//! - `Completed` / `Failed` are absorbing: once the stored status is
//!   terminal, every further report is a no-op.
//! - Status never moves backward (`Pending` -> `Processing` ->
//!   terminal).
//! - Progress is clamped to the running maximum: providers are not
//!   trusted to report monotonically, and a late out-of-order poll must
//!   not wind progress back.

use serde::Serialize;

use crate::status::{NormalizedStatus, TaskStatus};

/// The field updates a reconciliation decided to apply.
///
/// Applied atomically via the task store's conditional
/// "update-if-not-terminal" operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusPatch {
    pub status: TaskStatus,
    pub progress: i16,
    pub result_url: Option<String>,
    pub error_message: Option<String>,
}

/// Decide what, if anything, a provider report changes on a stored task.
///
/// Returns `None` when the report must be ignored: the stored status is
/// already terminal, or the report contains nothing newer than what is
/// stored (duplicate webhook deliveries land here).
pub fn plan_patch(
    current_status: TaskStatus,
    current_progress: i16,
    incoming: &NormalizedStatus,
) -> Option<StatusPatch> {
    // Absorbing states: nothing overwrites a terminal task.
    if current_status.is_terminal() {
        return None;
    }

    match incoming.status {
        TaskStatus::Completed => Some(StatusPatch {
            status: TaskStatus::Completed,
            progress: 100,
            result_url: incoming.result_url.clone(),
            error_message: None,
        }),
        TaskStatus::Failed => Some(StatusPatch {
            status: TaskStatus::Failed,
            // Progress stays where it was; a failure report carries no
            // meaningful progress value.
            progress: current_progress,
            result_url: None,
            error_message: incoming.error.clone(),
        }),
        TaskStatus::Processing | TaskStatus::Pending => {
            // Never regress the status axis.
            let status = if incoming.status.rank() > current_status.rank() {
                incoming.status
            } else {
                current_status
            };
            // Clamp-to-max progress policy.
            let progress = incoming.progress.clamp(0, 100).max(current_progress);

            if status == current_status && progress == current_progress {
                return None;
            }
            Some(StatusPatch {
                status,
                progress,
                result_url: None,
                error_message: None,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_report_terminalizes() {
        let patch = plan_patch(
            TaskStatus::Processing,
            40,
            &NormalizedStatus::completed("https://cdn.example.com/out.mp4"),
        )
        .unwrap();
        assert_eq!(patch.status, TaskStatus::Completed);
        assert_eq!(patch.progress, 100);
        assert_eq!(
            patch.result_url.as_deref(),
            Some("https://cdn.example.com/out.mp4")
        );
    }

    #[test]
    fn terminal_state_absorbs_everything() {
        // Duplicate completion, late progress, even a contradictory
        // failure report: all ignored once terminal.
        let reports = [
            NormalizedStatus::completed("https://cdn.example.com/other.mp4"),
            NormalizedStatus::processing(55),
            NormalizedStatus::failed("provider changed its mind"),
        ];
        for report in &reports {
            assert_eq!(plan_patch(TaskStatus::Completed, 100, report), None);
            assert_eq!(plan_patch(TaskStatus::Failed, 40, report), None);
        }
    }

    #[test]
    fn failed_report_keeps_progress_and_sets_message() {
        let patch = plan_patch(
            TaskStatus::Processing,
            72,
            &NormalizedStatus::failed("face not detected"),
        )
        .unwrap();
        assert_eq!(patch.status, TaskStatus::Failed);
        assert_eq!(patch.progress, 72);
        assert_eq!(patch.error_message.as_deref(), Some("face not detected"));
        assert_eq!(patch.result_url, None);
    }

    #[test]
    fn progress_advances_forward() {
        let patch = plan_patch(TaskStatus::Processing, 40, &NormalizedStatus::processing(70)).unwrap();
        assert_eq!(patch.status, TaskStatus::Processing);
        assert_eq!(patch.progress, 70);
    }

    #[test]
    fn out_of_order_progress_is_clamped() {
        // Scenario: stored progress already advanced to 70; a stale poll
        // reports 55. Progress holds at 70 and status stays Processing.
        assert_eq!(
            plan_patch(TaskStatus::Processing, 70, &NormalizedStatus::processing(55)),
            None
        );
    }

    #[test]
    fn status_never_regresses_to_pending() {
        let report = NormalizedStatus {
            status: TaskStatus::Pending,
            progress: 0,
            result_url: None,
            error: None,
        };
        assert_eq!(plan_patch(TaskStatus::Processing, 30, &report), None);
    }

    #[test]
    fn pending_task_acknowledged_as_processing() {
        let patch = plan_patch(TaskStatus::Pending, 0, &NormalizedStatus::processing(0)).unwrap();
        assert_eq!(patch.status, TaskStatus::Processing);
        assert_eq!(patch.progress, 0);
    }

    #[test]
    fn wild_progress_values_are_clamped_into_range() {
        let patch = plan_patch(TaskStatus::Processing, 10, &NormalizedStatus::processing(250)).unwrap();
        assert_eq!(patch.progress, 100);
        assert_eq!(
            plan_patch(TaskStatus::Processing, 10, &NormalizedStatus::processing(-5)),
            None
        );
    }
}
