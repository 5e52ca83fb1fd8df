//! Client for the primary Veo3-style generation API.
//!
//! Bearer-token REST API. Supports both pre-recorded audio and native
//! speech synthesis from a text prompt, so its capability gate accepts
//! every valid request. Status vocabulary: `queued`, `generating`,
//! `done`, `error`; the webhook payload correlates by `task_id`.

use async_trait::async_trait;
use serde::Deserialize;

use synclip_core::request::{GenerationRequest, QualityTier, SourceKind};
use synclip_core::status::{NormalizedStatus, TaskStatus};

use crate::client::{ProviderClient, ProviderId, WebhookEvent, PROBE_TIMEOUT, SUBMIT_TIMEOUT};
use crate::config::Veo3Settings;
use crate::error::ProviderError;

/// HTTP client for the Veo3 lip-sync API.
pub struct Veo3Client {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    /// Webhook URL the provider should push status to, when configured.
    callback_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Response from `POST /v1/lipsync/tasks`.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    task_id: String,
}

/// Response from `GET /v1/lipsync/tasks/{id}` and the webhook payload
/// body (the provider uses the same shape for both).
#[derive(Debug, Deserialize)]
struct TaskStatusResponse {
    task_id: String,
    status: String,
    #[serde(default)]
    progress: Option<i16>,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Translate the provider's status vocabulary to the normalized set.
///
/// Unrecognized tokens map to `Processing` with the reported progress:
/// a token we have never seen must not terminalize the task.
fn map_status(response: &TaskStatusResponse) -> NormalizedStatus {
    let progress = response.progress.unwrap_or(0);
    match response.status.as_str() {
        "queued" => NormalizedStatus {
            status: TaskStatus::Pending,
            progress: 0,
            result_url: None,
            error: None,
        },
        "generating" => NormalizedStatus::processing(progress),
        "done" => NormalizedStatus {
            status: TaskStatus::Completed,
            progress: 100,
            result_url: response.video_url.clone(),
            error: None,
        },
        "error" => NormalizedStatus::failed(
            response
                .error
                .clone()
                .unwrap_or_else(|| "Provider reported an unspecified error".to_string()),
        ),
        other => {
            tracing::warn!(token = %other, "Unrecognized veo3 status token, treating as processing");
            NormalizedStatus::processing(progress)
        }
    }
}

/// Map a quality tier onto the provider's resolution vocabulary.
/// Veo3 supports every tier directly.
fn resolution(tier: QualityTier) -> &'static str {
    match tier {
        QualityTier::Low => "480p",
        QualityTier::Medium => "720p",
        QualityTier::High => "1080p",
        QualityTier::Ultra => "2160p",
    }
}

impl Veo3Client {
    pub fn new(settings: Veo3Settings, callback_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: settings.api_key,
            base_url: settings.base_url,
            model: settings.model,
            callback_url,
        }
    }

    fn submission_error(&self, message: impl Into<String>) -> ProviderError {
        ProviderError::Submission {
            provider: ProviderId::Veo3,
            message: message.into(),
        }
    }
}

#[async_trait]
impl ProviderClient for Veo3Client {
    fn id(&self) -> ProviderId {
        ProviderId::Veo3
    }

    async fn test_connection(&self) -> bool {
        let result = self
            .http
            .get(format!("{}/v1/account/quota", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "veo3 connection test failed");
                false
            }
        }
    }

    fn supports(&self, request: &GenerationRequest) -> bool {
        // Native TTS: audio_url or audio_prompt both work. Every source
        // kind and tier is accepted.
        request.has_audio_url() || request.has_audio_prompt()
    }

    fn estimated_time(&self, request: &GenerationRequest) -> String {
        match request.quality_tier {
            QualityTier::Low | QualityTier::Medium => "2-4 minutes".to_string(),
            QualityTier::High => "4-8 minutes".to_string(),
            QualityTier::Ultra => "8-15 minutes".to_string(),
        }
    }

    async fn create_task(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let mut body = serde_json::json!({
            "model": self.model,
            "resolution": resolution(request.quality_tier),
            "duration_secs": request.duration_secs,
            "features": {
                "enhanced_audio": request.options.enhanced_audio,
                "cinematic_camera": request.options.cinematic_camera,
                "dynamic_lighting": request.options.dynamic_lighting,
            },
        });

        match request.source_kind {
            SourceKind::Image => body["image_url"] = request.source_url.clone().into(),
            SourceKind::Video => body["video_url"] = request.source_url.clone().into(),
        }
        if let Some(audio_url) = request.audio_url.as_deref() {
            body["audio_url"] = audio_url.into();
        }
        if let Some(prompt) = request.audio_prompt.as_deref() {
            body["audio_prompt"] = prompt.into();
        }
        if let Some(callback) = self.callback_url.as_deref() {
            body["callback_url"] = callback.into();
        }

        let response = self
            .http
            .post(format!("{}/v1/lipsync/tasks", self.base_url))
            .bearer_auth(&self.api_key)
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

        let submit: SubmitResponse = response
            .json()
            .await
            .map_err(|e| self.submission_error(format!("Malformed submit response: {e}")))?;

        if submit.task_id.is_empty() {
            return Err(self.submission_error("Provider returned an empty task id"));
        }

        tracing::info!(task_id = %submit.task_id, "veo3 task created");
        Ok(submit.task_id)
    }

    async fn get_status(&self, external_task_id: &str) -> Result<NormalizedStatus, ProviderError> {
        let response = self
            .http
            .get(format!(
                "{}/v1/lipsync/tasks/{external_task_id}",
                self.base_url
            ))
            .bearer_auth(&self.api_key)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| ProviderError::StatusQuery {
                provider: ProviderId::Veo3,
                message: format!("Request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::StatusQuery {
                provider: ProviderId::Veo3,
                message: format!("HTTP {status}: {body}"),
            });
        }

        let parsed: TaskStatusResponse =
            response.json().await.map_err(|e| ProviderError::StatusQuery {
                provider: ProviderId::Veo3,
                message: format!("Malformed status response: {e}"),
            })?;

        Ok(map_status(&parsed))
    }

    fn parse_webhook(&self, payload: &serde_json::Value) -> Result<WebhookEvent, ProviderError> {
        let parsed: TaskStatusResponse = serde_json::from_value(payload.clone()).map_err(|e| {
            ProviderError::WebhookPayload {
                provider: ProviderId::Veo3,
                message: e.to_string(),
            }
        })?;

        if parsed.task_id.is_empty() {
            return Err(ProviderError::WebhookPayload {
                provider: ProviderId::Veo3,
                message: "Missing task_id".to_string(),
            });
        }

        let status = map_status(&parsed);
        Ok(WebhookEvent {
            external_task_id: parsed.task_id,
            status,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use synclip_core::request::GenerationOptions;

    fn client() -> Veo3Client {
        Veo3Client::new(
            Veo3Settings {
                api_key: "test-key".to_string(),
                base_url: "https://api.veo3.test".to_string(),
                model: "veo3-lipsync".to_string(),
            },
            None,
        )
    }

    fn request(audio_url: Option<&str>, audio_prompt: Option<&str>) -> GenerationRequest {
        GenerationRequest {
            source_kind: SourceKind::Image,
            source_url: "https://x/img.jpg".to_string(),
            audio_url: audio_url.map(str::to_string),
            audio_prompt: audio_prompt.map(str::to_string),
            quality_tier: QualityTier::Medium,
            duration_secs: 10,
            options: GenerationOptions::default(),
        }
    }

    #[test]
    fn supports_prompt_only_requests() {
        let c = client();
        assert!(c.supports(&request(None, Some("Hello world"))));
        assert!(c.supports(&request(Some("https://x/a.mp3"), None)));
        assert!(!c.supports(&request(None, None)));
    }

    #[test]
    fn resolution_mapping_is_total() {
        assert_eq!(resolution(QualityTier::Low), "480p");
        assert_eq!(resolution(QualityTier::Medium), "720p");
        assert_eq!(resolution(QualityTier::High), "1080p");
        assert_eq!(resolution(QualityTier::Ultra), "2160p");
    }

    #[test]
    fn maps_done_to_completed() {
        let parsed: TaskStatusResponse = serde_json::from_value(serde_json::json!({
            "task_id": "t-1",
            "status": "done",
            "progress": 100,
            "video_url": "https://cdn.veo3.test/out.mp4",
        }))
        .unwrap();
        let normalized = map_status(&parsed);
        assert_eq!(normalized.status, TaskStatus::Completed);
        assert_eq!(normalized.progress, 100);
        assert_eq!(
            normalized.result_url.as_deref(),
            Some("https://cdn.veo3.test/out.mp4")
        );
    }

    #[test]
    fn maps_error_to_failed_with_message() {
        let parsed: TaskStatusResponse = serde_json::from_value(serde_json::json!({
            "task_id": "t-1",
            "status": "error",
            "error": "face not detected",
        }))
        .unwrap();
        let normalized = map_status(&parsed);
        assert_eq!(normalized.status, TaskStatus::Failed);
        assert_eq!(normalized.error.as_deref(), Some("face not detected"));
    }

    #[test]
    fn unrecognized_token_fails_open_to_processing() {
        let parsed: TaskStatusResponse = serde_json::from_value(serde_json::json!({
            "task_id": "t-1",
            "status": "warming_up",
            "progress": 12,
        }))
        .unwrap();
        let normalized = map_status(&parsed);
        assert_eq!(normalized.status, TaskStatus::Processing);
        assert_eq!(normalized.progress, 12);
        assert_eq!(normalized.result_url, None);
        assert_eq!(normalized.error, None);
    }

    #[test]
    fn webhook_parse_extracts_task_id() {
        let event = client()
            .parse_webhook(&serde_json::json!({
                "task_id": "t-42",
                "status": "generating",
                "progress": 55,
            }))
            .unwrap();
        assert_eq!(event.external_task_id, "t-42");
        assert_eq!(event.status, NormalizedStatus::processing(55));
    }

    #[test]
    fn webhook_parse_rejects_missing_task_id() {
        assert!(client()
            .parse_webhook(&serde_json::json!({ "status": "done" }))
            .is_err());
    }
}
