//! Normalized task status vocabulary.
//!
//! Every provider speaks its own status dialect ("queued", "started",
//! "done", "rejected", ...). Provider clients translate those tokens
//! into the closed set here before anything else in the system sees
//! them; unrecognized tokens map to [`TaskStatus::Processing`]: a
//! garbled status must never terminalize a task.

use serde::{Deserialize, Serialize};

/// Normalized lifecycle state of a generation task.
///
/// `Completed` and `Failed` are absorbing: no input from the webhook
/// path or the poll path transitions a task out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Whether this status is absorbing.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Stable string form, matching the `status` column values.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Rank used to forbid backward transitions (`Pending` <
    /// `Processing` < terminal). The two terminal states share a rank;
    /// neither can replace the other.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Processing => 1,
            Self::Completed | Self::Failed => 2,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("Unknown task status '{other}'")),
        }
    }
}

/// Lets the database layer decode the TEXT `status` column directly
/// into the enum via `#[sqlx(try_from = "String")]`.
impl TryFrom<String> for TaskStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A provider-reported task state after translation to the normalized
/// vocabulary. Produced by provider status polls and webhook payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedStatus {
    pub status: TaskStatus,
    /// 0-100. Providers are not trusted to report this monotonically.
    pub progress: i16,
    /// Set only when `status` is `Completed`.
    pub result_url: Option<String>,
    /// Set only when `status` is `Failed`.
    pub error: Option<String>,
}

impl NormalizedStatus {
    /// A bare `Processing` report with the given progress and no
    /// terminal fields.
    pub fn processing(progress: i16) -> Self {
        Self {
            status: TaskStatus::Processing,
            progress,
            result_url: None,
            error: None,
        }
    }

    /// A terminal `Completed` report.
    pub fn completed(result_url: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Completed,
            progress: 100,
            result_url: Some(result_url.into()),
            error: None,
        }
    }

    /// A terminal `Failed` report.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Failed,
            progress: 0,
            result_url: None,
            error: Some(error.into()),
        }
    }
}
