//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use std::sync::Arc;

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{api_key_middleware, ApiKeyAuth};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let auth = Arc::new(ApiKeyAuth::new(&state.settings.api_key));

    Router::new()
        .nest("/api", api_routes())
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        // Exempt prefixes are skipped inside the middleware
        .layer(middleware::from_fn_with_state(auth, api_key_middleware))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/users", user_routes())
}

/// Product routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::product::list_products).post(handlers::product::create_product),
        )
        .route("/search", get(handlers::product::search_products))
        .route("/price-range", get(handlers::product::get_products_by_price_range))
        .route("/sku/{sku}", get(handlers::product::get_product_by_sku))
        .route("/name/{name}", get(handlers::product::get_products_by_name))
        .route(
            "/{product_id}",
            get(handlers::product::get_product)
                .put(handlers::product::update_product)
                .delete(handlers::product::delete_product),
        )
}

/// Category and analytics routes
fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::category::list_categories).post(handlers::category::create_category),
        )
        .route("/{category_id}", get(handlers::category::get_category))
        .route(
            "/analytics",
            get(handlers::analytics::get_all_category_analytics),
        )
        .route("/analytics/overall", get(handlers::analytics::get_overall_metrics))
        .route("/analytics/top", get(handlers::analytics::get_top_categories))
        .route("/analytics/trends", get(handlers::analytics::get_category_trends))
        .route(
            "/analytics/{category_id}",
            get(handlers::analytics::get_category_analytics),
        )
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::user::create_user))
        .route("/username/{username}", get(handlers::user::get_user_by_username))
        .route(
            "/{user_id}",
            get(handlers::user::get_user)
                .put(handlers::user::update_user)
                .delete(handlers::user::delete_user),
        )
}
