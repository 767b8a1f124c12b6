//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use fake::faker::lorem::en::Word;
use fake::Fake;
use serde_json::{json, Value};

use inventory_service::config::Settings;
use inventory_service::startup::{build_router, AppState};

pub const TEST_API_KEY: &str = "test-api-key";
pub const API_KEY_HEADER: &str = "x-api-key";

/// Test application backed by in-memory repositories
pub struct TestApp {
    pub server: TestServer,
}

impl TestApp {
    /// Application with API key authentication enabled
    pub fn new() -> Self {
        Self::with_settings(Self::settings())
    }

    /// Settings used by [`TestApp::new`]
    pub fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.api_key.key = TEST_API_KEY.to_string();
        settings
    }

    pub fn with_settings(settings: Settings) -> Self {
        let router = build_router(AppState::in_memory(settings));
        Self {
            server: TestServer::new(router).expect("failed to start test server"),
        }
    }

    fn authed(request: TestRequest) -> TestRequest {
        request.add_header(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_static(TEST_API_KEY),
        )
    }

    /// Authenticated GET
    pub fn get(&self, path: &str) -> TestRequest {
        Self::authed(self.server.get(path))
    }

    /// Authenticated POST with JSON body
    pub fn post(&self, path: &str, body: &Value) -> TestRequest {
        Self::authed(self.server.post(path)).json(body)
    }

    /// Authenticated PUT with JSON body
    pub fn put(&self, path: &str, body: &Value) -> TestRequest {
        Self::authed(self.server.put(path)).json(body)
    }

    /// Authenticated DELETE
    pub fn delete(&self, path: &str) -> TestRequest {
        Self::authed(self.server.delete(path))
    }

    /// Create a category and return its id
    pub async fn create_category(&self, name: &str) -> i64 {
        let response = self
            .post("/api/categories", &json!({ "name": name }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["id"].as_i64().expect("category id")
    }

    /// Create a product and return the response body
    pub async fn create_product(&self, body: Value) -> Value {
        let response = self.post("/api/products", &body).await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()
    }
}

/// A valid product body with a unique SKU
pub fn product_body(price: f64, quantity: i32, category_id: Option<i64>) -> Value {
    let word: String = Word().fake();
    json!({
        "name": format!("{} {}", word, unique_suffix()),
        "description": "Integration test product",
        "sku": unique_sku(),
        "price": price,
        "quantityInStock": quantity,
        "categoryId": category_id,
    })
}

/// Generate a unique SKU
pub fn unique_sku() -> String {
    format!("SKU-{}", unique_suffix())
}

/// Generate a unique test username
pub fn unique_username() -> String {
    format!("user_{}", unique_suffix())
}

/// Generate a unique test email
pub fn unique_email() -> String {
    format!("test_{}@example.com", uuid::Uuid::new_v4())
}

fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}
