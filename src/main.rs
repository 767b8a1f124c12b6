//! # Inventory Service
//!
//! A product inventory microservice with category analytics.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Repositories (in-memory or PostgreSQL)
//! - HTTP server

use anyhow::Result;
use tracing::info;

use inventory_service::config::Settings;
use inventory_service::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    inventory_service::telemetry::init_tracing();

    info!("Starting Inventory Service...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        backend = ?settings.storage.backend,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
