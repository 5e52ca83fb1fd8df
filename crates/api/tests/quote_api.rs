//! Cost quote endpoint tests.
//!
//! The quote handler is pure, so these run against the full router
//! without touching the database.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn quote_returns_expected_credits() {
    // high tier (20/block) over 25s is 3 billing blocks.
    let response = common::get(
        common::build_test_app(),
        "/api/v1/lipsync/quote?quality_tier=high&duration_secs=25",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["credits"], 60);
    assert_eq!(body["data"]["quality_tier"], "high");
    assert_eq!(body["data"]["duration_secs"], 25);
}

#[tokio::test]
async fn quote_adds_option_surcharges() {
    let response = common::get(
        common::build_test_app(),
        "/api/v1/lipsync/quote?quality_tier=low&duration_secs=10&enhanced_audio=true&dynamic_lighting=true",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    // low base 5 for one block, +3 enhanced audio, +4 dynamic lighting.
    assert_eq!(body["data"]["credits"], 12);
}

#[tokio::test]
async fn quote_is_deterministic() {
    let uri = "/api/v1/lipsync/quote?quality_tier=ultra&duration_secs=90&cinematic_camera=true";

    let first = common::body_json(common::get(common::build_test_app(), uri).await).await;
    let second = common::body_json(common::get(common::build_test_app(), uri).await).await;

    assert_eq!(first["data"]["credits"], second["data"]["credits"]);
}

#[tokio::test]
async fn quote_rejects_missing_parameters() {
    let response = common::get(common::build_test_app(), "/api/v1/lipsync/quote").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let response = common::get(common::build_test_app(), "/api/v1/nonexistent").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
