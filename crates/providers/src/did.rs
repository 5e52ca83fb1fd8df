//! Client for the backup D-ID-style talking-head API.
//!
//! Basic-auth REST API built around "talks". No speech synthesis: the
//! capability gate declines requests that carry only a text prompt, so
//! the registry skips this provider instead of submitting a job it
//! would reject. Status vocabulary: `created`, `started`, `done`,
//! `error`, `rejected`; the webhook payload correlates by `job_id`.

use async_trait::async_trait;
use serde::Deserialize;

use synclip_core::request::{GenerationRequest, QualityTier};
use synclip_core::status::{NormalizedStatus, TaskStatus};

use crate::client::{ProviderClient, ProviderId, WebhookEvent, PROBE_TIMEOUT, SUBMIT_TIMEOUT};
use crate::config::DidSettings;
use crate::error::ProviderError;

/// Coarse progress reported while a talk is running. The provider
/// exposes no numeric progress; the stored value only ever moves
/// forward thanks to the clamp-to-max reconciliation rule.
const RUNNING_PROGRESS: i16 = 50;

/// HTTP client for the D-ID talks API.
pub struct DidClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    callback_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Response from `POST /talks`.
#[derive(Debug, Deserialize)]
struct CreateTalkResponse {
    id: String,
}

/// Nested error envelope the provider attaches to failed talks.
#[derive(Debug, Deserialize)]
struct TalkError {
    #[serde(default)]
    description: Option<String>,
}

/// Response from `GET /talks/{id}`.
#[derive(Debug, Deserialize)]
struct TalkStatusResponse {
    status: String,
    #[serde(default)]
    result_url: Option<String>,
    #[serde(default)]
    error: Option<TalkError>,
}

/// Webhook payload. Unlike the status response it carries the talk id,
/// under `job_id`.
#[derive(Debug, Deserialize)]
struct TalkWebhookPayload {
    job_id: String,
    #[serde(flatten)]
    status: TalkStatusResponse,
}

/// Translate the provider's talk status to the normalized vocabulary.
/// Unrecognized tokens map to `Processing` (fail open).
fn map_status(response: &TalkStatusResponse) -> NormalizedStatus {
    match response.status.as_str() {
        "created" => NormalizedStatus {
            status: TaskStatus::Pending,
            progress: 0,
            result_url: None,
            error: None,
        },
        "started" => NormalizedStatus::processing(RUNNING_PROGRESS),
        "done" => NormalizedStatus {
            status: TaskStatus::Completed,
            progress: 100,
            result_url: response.result_url.clone(),
            error: None,
        },
        "error" | "rejected" => NormalizedStatus::failed(
            response
                .error
                .as_ref()
                .and_then(|e| e.description.clone())
                .unwrap_or_else(|| format!("Talk {}", response.status)),
        ),
        other => {
            tracing::warn!(token = %other, "Unrecognized did status token, treating as processing");
            NormalizedStatus::processing(RUNNING_PROGRESS)
        }
    }
}

/// Map a quality tier onto the provider's two supported resolutions.
/// `Low` rounds up to 720p; `Ultra` caps at the provider maximum of
/// 1080p.
fn resolution(tier: QualityTier) -> &'static str {
    match tier {
        QualityTier::Low | QualityTier::Medium => "720p",
        QualityTier::High | QualityTier::Ultra => "1080p",
    }
}

impl DidClient {
    pub fn new(settings: DidSettings, callback_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: settings.api_key,
            base_url: settings.base_url,
            callback_url,
        }
    }

    fn submission_error(&self, message: impl Into<String>) -> ProviderError {
        ProviderError::Submission {
            provider: ProviderId::Did,
            message: message.into(),
        }
    }
}

#[async_trait]
impl ProviderClient for DidClient {
    fn id(&self) -> ProviderId {
        ProviderId::Did
    }

    async fn test_connection(&self) -> bool {
        let result = self
            .http
            .get(format!("{}/credits", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "did connection test failed");
                false
            }
        }
    }

    fn supports(&self, request: &GenerationRequest) -> bool {
        // No speech synthesis: a pre-recorded audio track is mandatory.
        request.has_audio_url()
    }

    fn estimated_time(&self, _request: &GenerationRequest) -> String {
        "1-3 minutes".to_string()
    }

    async fn create_task(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        // The capability gate should have filtered prompt-only requests;
        // double-check rather than submit a job the provider rejects.
        let Some(audio_url) = request.audio_url.as_deref().filter(|u| !u.trim().is_empty())
        else {
            return Err(self.submission_error("Provider requires a pre-recorded audio_url"));
        };

        let mut body = serde_json::json!({
            "source_url": request.source_url,
            "script": {
                "type": "audio",
                "audio_url": audio_url,
            },
            "config": {
                "result_format": "mp4",
                "resolution": resolution(request.quality_tier),
            },
        });
        if let Some(callback) = self.callback_url.as_deref() {
            body["webhook"] = callback.into();
        }

        let response = self
            .http
            .post(format!("{}/talks", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .timeout(SUBMIT_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.submission_error(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(self.submission_error(format!("HTTP {status}: {body}")));
        }

        let talk: CreateTalkResponse = response
            .json()
            .await
            .map_err(|e| self.submission_error(format!("Malformed create response: {e}")))?;

        if talk.id.is_empty() {
            return Err(self.submission_error("Provider returned an empty talk id"));
        }

        tracing::info!(talk_id = %talk.id, "did talk created");
        Ok(talk.id)
    }

    async fn get_status(&self, external_task_id: &str) -> Result<NormalizedStatus, ProviderError> {
        let response = self
            .http
            .get(format!("{}/talks/{external_task_id}", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| ProviderError::StatusQuery {
                provider: ProviderId::Did,
                message: format!("Request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::StatusQuery {
                provider: ProviderId::Did,
                message: format!("HTTP {status}: {body}"),
            });
        }

        let parsed: TalkStatusResponse =
            response.json().await.map_err(|e| ProviderError::StatusQuery {
                provider: ProviderId::Did,
                message: format!("Malformed status response: {e}"),
            })?;

        Ok(map_status(&parsed))
    }

    fn parse_webhook(&self, payload: &serde_json::Value) -> Result<WebhookEvent, ProviderError> {
        let parsed: TalkWebhookPayload = serde_json::from_value(payload.clone()).map_err(|e| {
            ProviderError::WebhookPayload {
                provider: ProviderId::Did,
                message: e.to_string(),
            }
        })?;

        if parsed.job_id.is_empty() {
            return Err(ProviderError::WebhookPayload {
                provider: ProviderId::Did,
                message: "Missing job_id".to_string(),
            });
        }

        let status = map_status(&parsed.status);
        Ok(WebhookEvent {
            external_task_id: parsed.job_id,
            status,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
