//! REST API endpoint tests

mod analytics_tests;
mod auth_tests;
mod health_tests;
mod product_tests;
mod user_tests;
