//! Provider registry: health-gated, strictly sequential failover.
//!
//! Single entry point hiding provider plurality from the rest of the
//! system. Submission walks the configured clients in fixed priority
//! order and stops at the first acceptance -- never a parallel fan-out,
//! which would risk paying two providers for the same job. Status
//! queries route straight to the provider that owns the task; a task
//! never migrates between providers.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use synclip_core::request::GenerationRequest;
use synclip_core::status::NormalizedStatus;

use crate::client::{ProviderClient, ProviderId};
use crate::config::ProvidersConfig;
use crate::did::DidClient;
use crate::error::{ProviderAttempt, ProviderError};
use crate::veo3::Veo3Client;

/// Outcome of a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    /// Provider-assigned task id.
    pub external_task_id: String,
    /// The provider that accepted the job; the task is bound to it for
    /// its entire lifetime.
    pub provider: ProviderId,
    /// Human-readable completion estimate, fixed at submission.
    pub estimated_time: String,
}

/// Owns the configured provider clients for the process lifetime.
pub struct ProviderRegistry {
    /// Priority order: index 0 is tried first.
    clients: Vec<Arc<dyn ProviderClient>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field(
                "clients",
                &self.clients.iter().map(|c| c.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ProviderRegistry {
    /// Build clients from configuration, primary first.
    ///
    /// A provider with missing credentials is omitted rather than
    /// constructed-and-failing later. Fails fast with
    /// [`ProviderError::NoProvidersConfigured`] when nothing is left.
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, ProviderError> {
        let mut clients: Vec<Arc<dyn ProviderClient>> = Vec::new();

        if let Some(veo3) = config.veo3.clone() {
            let callback = webhook_url(config, ProviderId::Veo3);
            clients.push(Arc::new(Veo3Client::new(veo3, callback)));
        } else {
            tracing::info!("veo3 provider not configured, skipping");
        }

        if let Some(did) = config.did.clone() {
            let callback = webhook_url(config, ProviderId::Did);
            clients.push(Arc::new(DidClient::new(did, callback)));
        } else {
            tracing::info!("did provider not configured, skipping");
        }

        Self::from_clients(clients)
    }

    /// Build a registry from pre-constructed clients in priority order.
    pub fn from_clients(clients: Vec<Arc<dyn ProviderClient>>) -> Result<Self, ProviderError> {
        if clients.is_empty() {
            return Err(ProviderError::NoProvidersConfigured);
        }
        tracing::info!(
            providers = ?clients.iter().map(|c| c.id()).collect::<Vec<_>>(),
            "Provider registry initialized",
        );
        Ok(Self { clients })
    }

    /// The client owning `provider`, if it was constructed.
    pub fn client(&self, provider: ProviderId) -> Option<&Arc<dyn ProviderClient>> {
        self.clients.iter().find(|c| c.id() == provider)
    }

    /// Submit a generation request, trying providers strictly in
    /// priority order until one accepts.
    ///
    /// Per provider: health gate, then capability gate, then one
    /// submission attempt. Gate skips and submission failures are
    /// recorded and the sweep continues; only when the list is
    /// exhausted does the caller see an error, aggregating every
    /// provider's distinct reason.
    pub async fn process_lip_sync(
        &self,
        request: &GenerationRequest,
    ) -> Result<Submission, ProviderError> {
        let mut attempts: Vec<ProviderAttempt> = Vec::new();

        for client in &self.clients {
            let provider = client.id();

            if !client.is_healthy().await {
                tracing::warn!(provider = %provider, "Provider failed health check, trying next");
                attempts.push(ProviderAttempt {
                    provider,
                    message: "health check failed".to_string(),
                });
                continue;
            }

            if !client.supports(request) {
                tracing::info!(
                    provider = %provider,
                    "Provider does not support this request's audio configuration, trying next",
                );
                attempts.push(ProviderAttempt {
                    provider,
                    message: "request's audio configuration not supported".to_string(),
                });
                continue;
            }

            match client.create_task(request).await {
                Ok(external_task_id) => {
                    tracing::info!(
                        provider = %provider,
                        external_task_id = %external_task_id,
                        "Submission accepted",
                    );
                    return Ok(Submission {
                        external_task_id,
                        provider,
                        estimated_time: client.estimated_time(request),
                    });
                }
                Err(e) => {
                    tracing::warn!(provider = %provider, error = %e, "Submission failed, trying next");
                    attempts.push(ProviderAttempt {
                        provider,
                        message: e.to_string(),
                    });
                }
            }
        }

        Err(ProviderError::AllProvidersFailed(attempts))
    }

    /// Query the provider that owns a task for its current normalized
    /// status. No failover: the task is bound to its provider.
    pub async fn get_task_status(
        &self,
        provider: ProviderId,
        external_task_id: &str,
    ) -> Result<NormalizedStatus, ProviderError> {
        let client = self
            .client(provider)
            .ok_or(ProviderError::Unavailable(provider))?;
        client.get_status(external_task_id).await
    }

    /// Health of every constructed provider. Diagnostic only; a
    /// provider's probe failure is reported as `false`, never raised.
    pub async fn providers_health(&self) -> HashMap<ProviderId, bool> {
        let mut health = HashMap::new();
        for client in &self.clients {
            health.insert(client.id(), client.is_healthy().await);
        }
        health
    }
}

/// Webhook callback URL for a provider, when a public base URL is
/// configured.
fn webhook_url(config: &ProvidersConfig, provider: ProviderId) -> Option<String> {
    config
        .public_base_url
        .as_deref()
        .map(|base| format!("{}/api/v1/webhooks/{}", base.trim_end_matches('/'), provider))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
