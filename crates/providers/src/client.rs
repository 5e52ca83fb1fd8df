//! The provider client contract.
//!
//! Every external video-generation service implements the same
//! [`ProviderClient`] trait even though the wire formats differ
//! completely. Shared logic (registry failover, webhook reconciliation)
//! only ever sees this contract plus the normalized shapes from
//! `synclip-core`; nothing outside a client module branches on a
//! provider tag.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use synclip_core::request::GenerationRequest;
use synclip_core::status::NormalizedStatus;

use crate::error::ProviderError;

// ---------------------------------------------------------------------------
// Timeouts
// ---------------------------------------------------------------------------

/// Timeout for lightweight health/status calls.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for submission calls, which can include payload transfer on
/// the provider side.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Provider identity
// ---------------------------------------------------------------------------

/// Closed set of configured providers, in no particular order; priority
/// is decided by registry construction, not by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    /// Primary text/image-to-video provider with native speech synthesis.
    Veo3,
    /// Backup talking-head provider; requires pre-recorded audio.
    Did,
}

impl ProviderId {
    /// Stable string tag, stored in the `provider` task column and used
    /// in webhook route paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Veo3 => "veo3",
            Self::Did => "did",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "veo3" => Ok(Self::Veo3),
            "did" => Ok(Self::Did),
            other => Err(format!("Unknown provider '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Webhook event
// ---------------------------------------------------------------------------

/// A provider webhook payload after per-provider parsing: the
/// provider's own task id plus the normalized status it reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEvent {
    pub external_task_id: String,
    pub status: NormalizedStatus,
}

// ---------------------------------------------------------------------------
// Client contract
// ---------------------------------------------------------------------------

/// One external video-generation service.
///
/// Implementations are stateless aside from held credentials and are
/// shared across concurrent requests behind an `Arc`.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// This client's identity tag.
    fn id(&self) -> ProviderId;

    /// Lightweight authenticated call used as a pre-flight health gate.
    /// Returns `false` on any network, auth, or schema problem; never
    /// errors.
    async fn test_connection(&self) -> bool;

    /// Health gate used by the registry before attempting submission.
    async fn is_healthy(&self) -> bool {
        self.test_connection().await
    }

    /// Whether this provider can serve the request's input combination
    /// (e.g. a provider without speech synthesis declines prompt-only
    /// audio). A `false` here makes the registry skip to the next
    /// provider without contacting this one.
    fn supports(&self, request: &GenerationRequest) -> bool;

    /// Human-readable completion estimate reported to the caller at
    /// submission time; never refined later.
    fn estimated_time(&self, request: &GenerationRequest) -> String;

    /// Submit the job. Returns the provider-assigned task id, or a
    /// [`ProviderError::Submission`] carrying the provider's raw
    /// message. Never returns an empty id without an error.
    async fn create_task(&self, request: &GenerationRequest) -> Result<String, ProviderError>;

    /// Query the provider for the current state of a task and translate
    /// it to the normalized vocabulary. Unrecognized status tokens map
    /// to `Processing` (fail open); transport failures error rather
    /// than fabricate a status.
    async fn get_status(&self, external_task_id: &str) -> Result<NormalizedStatus, ProviderError>;

    /// Parse this provider's webhook payload into a [`WebhookEvent`].
    /// Pure: no outbound calls happen here (the webhook handler must
    /// stay fast and must never poll synchronously).
    fn parse_webhook(&self, payload: &serde_json::Value) -> Result<WebhookEvent, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_string_round_trip() {
        for id in [ProviderId::Veo3, ProviderId::Did] {
            assert_eq!(id.as_str().parse::<ProviderId>().unwrap(), id);
        }
        assert!("runway".parse::<ProviderId>().is_err());
    }
}
