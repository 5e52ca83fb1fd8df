//! Error types for the provider orchestration layer.

use crate::client::ProviderId;

/// One provider's failure during a failover sweep, kept so the
/// aggregate error can name every provider's distinct reason.
#[derive(Debug, Clone)]
pub struct ProviderAttempt {
    pub provider: ProviderId,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// A single provider rejected or failed to accept a job.
    /// Recoverable: the registry tries the next provider.
    #[error("Provider {provider} submission failed: {message}")]
    Submission {
        provider: ProviderId,
        message: String,
    },

    /// Every provider in the priority list was skipped or failed.
    /// Terminal for the request.
    #[error("All providers failed: {}", format_attempts(.0))]
    AllProvidersFailed(Vec<ProviderAttempt>),

    /// A status query named a provider whose client was never
    /// constructed (credentials missing or removed).
    #[error("Provider {0} is not configured")]
    Unavailable(ProviderId),

    /// A single status probe failed at the transport level. Recovered
    /// locally by returning the last-known cached state.
    #[error("Status query to {provider} failed: {message}")]
    StatusQuery {
        provider: ProviderId,
        message: String,
    },

    /// A webhook payload did not match the provider's expected shape.
    #[error("Malformed {provider} webhook payload: {message}")]
    WebhookPayload {
        provider: ProviderId,
        message: String,
    },

    /// Construction-time fatal: zero providers configured.
    #[error("No lip-sync providers are configured")]
    NoProvidersConfigured,
}

/// Join every attempt as `provider: reason` for the aggregate message.
fn format_attempts(attempts: &[ProviderAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.provider, a.message))
        .collect::<Vec<_>>()
        .join("; ")
}
