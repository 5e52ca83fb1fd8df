//! Error response mapping tests.
//!
//! These exercise `AppError`'s `IntoResponse` implementation directly;
//! they do not need an HTTP server or a database.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use uuid::Uuid;

use synclip_api::error::AppError;
use synclip_core::error::CoreError;
use synclip_providers::{ProviderAttempt, ProviderError, ProviderId};

/// Render an `AppError` and pull the status plus `{error, code}` body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).expect("error body must be JSON");
    (status, json)
}

#[tokio::test]
async fn core_not_found_maps_to_404() {
    let id = Uuid::new_v4();
    let err = AppError::Core(CoreError::NotFound {
        entity: "Task",
        id,
    });

    let (status, body) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["error"].as_str().unwrap().contains(&id.to_string()));
}

#[tokio::test]
async fn core_validation_maps_to_400() {
    let err = AppError::Core(CoreError::Validation(
        "duration_secs must be between 1 and 600".to_string(),
    ));

    let (status, body) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "duration_secs must be between 1 and 600");
}

#[tokio::test]
async fn core_internal_sanitizes_message() {
    let err = AppError::Core(CoreError::Internal(
        "connection pool exhausted at 10.0.0.3".to_string(),
    ));

    let (status, body) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_ERROR");
    // Internal details must never leak to the client.
    assert_eq!(body["error"], "An internal error occurred");
}

#[tokio::test]
async fn all_providers_failed_maps_to_502_with_every_reason() {
    let err = AppError::Provider(ProviderError::AllProvidersFailed(vec![
        ProviderAttempt {
            provider: ProviderId::Veo3,
            message: "Quota exceeded".to_string(),
        },
        ProviderAttempt {
            provider: ProviderId::Did,
            message: "Request requires an audio URL".to_string(),
        },
    ]));

    let (status, body) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "ALL_PROVIDERS_FAILED");
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("veo3"));
    assert!(message.contains("Quota exceeded"));
    assert!(message.contains("did"));
    assert!(message.contains("Request requires an audio URL"));
}

#[tokio::test]
async fn unconfigured_provider_maps_to_503() {
    let err = AppError::Provider(ProviderError::Unavailable(ProviderId::Did));

    let (status, body) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "PROVIDER_UNAVAILABLE");
    assert!(body["error"].as_str().unwrap().contains("did"));
}

#[tokio::test]
async fn empty_registry_maps_to_503() {
    let err = AppError::Provider(ProviderError::NoProvidersConfigured);

    let (status, body) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "NO_PROVIDERS");
}

#[tokio::test]
async fn bad_webhook_payload_maps_to_400() {
    let err = AppError::Provider(ProviderError::WebhookPayload {
        provider: ProviderId::Veo3,
        message: "Missing task_id".to_string(),
    });

    let (status, body) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_WEBHOOK_PAYLOAD");
}

#[tokio::test]
async fn unauthorized_maps_to_401() {
    let err = AppError::Unauthorized("Invalid webhook signature".to_string());

    let (status, body) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["error"], "Invalid webhook signature");
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let err = AppError::Database(sqlx::Error::RowNotFound);

    let (status, body) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn bad_request_keeps_message() {
    let err = AppError::BadRequest("Request body is not valid JSON".to_string());

    let (status, body) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(body["error"], "Request body is not valid JSON");
}
