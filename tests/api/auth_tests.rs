//! API Key Authentication Tests

use axum::http::{HeaderName, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::{TestApp, API_KEY_HEADER};

#[tokio::test]
async fn test_missing_api_key_is_rejected() {
    let app = TestApp::new();

    let response = app.server.get("/api/products").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body = response.json::<Value>();
    assert_eq!(body["message"], "API key is missing");
    assert_eq!(body["code"], 10003);
}

#[tokio::test]
async fn test_wrong_api_key_is_rejected() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/api/products")
        .add_header(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_static("not-the-key"),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["message"], "Invalid API key");
}

#[tokio::test]
async fn test_valid_api_key_is_accepted() {
    let app = TestApp::new();

    app.get("/api/products").await.assert_status_ok();
}

#[tokio::test]
async fn test_health_and_metrics_are_exempt() {
    let app = TestApp::new();

    app.server.get("/health").await.assert_status_ok();
    app.server.get("/health/ready").await.assert_status_ok();
    app.server.get("/metrics").await.assert_status_ok();
}

#[tokio::test]
async fn test_custom_header_name() {
    let mut settings = TestApp::settings();
    settings.api_key.header_name = "X-Inventory-Key".into();
    let app = TestApp::with_settings(settings);

    let response = app
        .server
        .get("/api/categories")
        .add_header(
            HeaderName::from_static("x-inventory-key"),
            HeaderValue::from_static(crate::common::TEST_API_KEY),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_disabled_authentication() {
    let mut settings = TestApp::settings();
    settings.api_key.enabled = false;
    let app = TestApp::with_settings(settings);

    app.server.get("/api/products").await.assert_status_ok();
}
