//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod analytics;
pub mod category;
pub mod health;
pub mod product;
pub mod user;
