//! Webhook endpoint tests covering the rejection paths that never
//! reach the database: unknown providers, unconfigured providers,
//! malformed bodies, and unparseable payloads.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn unknown_provider_returns_404() {
    let response = common::post_json(
        common::build_test_app(),
        "/api/v1/webhooks/runway",
        json!({"task_id": "t-1"}),
    )
    .await;

    common::assert_error_code(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[tokio::test]
async fn unconfigured_provider_returns_503() {
    // The test registry only carries the primary provider.
    let response = common::post_json(
        common::build_test_app(),
        "/api/v1/webhooks/did",
        json!({"id": "talk-1", "status": "done"}),
    )
    .await;

    common::assert_error_code(response, StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE")
        .await;
}

#[tokio::test]
async fn malformed_json_body_returns_400() {
    let app = common::build_test_app();

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/v1/webhooks/veo3")
                .header("content-type", "application/json")
                .body(axum::body::Body::from("not json at all"))
                .expect("request build"),
        )
        .await
        .expect("request must produce a response");

    common::assert_error_code(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;
}

#[tokio::test]
async fn unparseable_payload_returns_400() {
    // Valid JSON that the provider's parser cannot correlate.
    let response = common::post_json(
        common::build_test_app(),
        "/api/v1/webhooks/veo3",
        json!({"unexpected": true}),
    )
    .await;

    common::assert_error_code(response, StatusCode::BAD_REQUEST, "BAD_WEBHOOK_PAYLOAD").await;
}
