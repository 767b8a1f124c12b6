//! Middleware
//!
//! Tower middleware for request processing.

pub mod auth;
pub mod cors;
pub mod logging;

pub use auth::{api_key_middleware, ApiKeyAuth};
pub use cors::create_cors_layer;
pub use logging::{
    create_trace_layer, propagate_request_id_layer, set_request_id_layer, track_metrics,
    REQUEST_ID_HEADER,
};
