//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{middleware, Router};
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::config::{RepositoryBackend, Settings};
use crate::domain::{CategoryRepository, ProductRepository, UserRepository};
use crate::infrastructure::database;
use crate::infrastructure::repositories::{
    InMemoryCategoryRepository, InMemoryProductRepository, InMemoryUserRepository,
    PgCategoryRepository, PgProductRepository, PgUserRepository,
};
use crate::presentation::http::{handlers, routes};
use crate::presentation::middleware::{
    create_cors_layer, create_trace_layer, propagate_request_id_layer, set_request_id_layer,
    track_metrics,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub users: Arc<dyn UserRepository>,
    /// Present only for the postgres backend
    pub db: Option<PgPool>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// State backed by process-local repositories
    pub fn in_memory(settings: Settings) -> Self {
        Self {
            products: Arc::new(InMemoryProductRepository::new()),
            categories: Arc::new(InMemoryCategoryRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            db: None,
            settings: Arc::new(settings),
        }
    }

    /// State backed by PostgreSQL
    pub fn postgres(pool: PgPool, settings: Settings) -> Self {
        Self {
            products: Arc::new(PgProductRepository::new(pool.clone())),
            categories: Arc::new(PgCategoryRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            db: Some(pool),
            settings: Arc::new(settings),
        }
    }
}

/// Build the router with every middleware layer applied
pub fn build_router(state: AppState) -> Router {
    let cors = create_cors_layer(&state.settings.cors, &state.settings.api_key);

    // Last added runs first: request id, then tracing, then metrics
    routes::create_router(state)
        .layer(middleware::from_fn(track_metrics))
        .layer(create_trace_layer())
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        handlers::health::init_server_start();

        let state = match settings.storage.backend {
            RepositoryBackend::Memory => {
                tracing::info!("Using in-memory repositories");
                AppState::in_memory(settings.clone())
            }
            RepositoryBackend::Postgres => {
                let url = settings
                    .database
                    .url
                    .as_deref()
                    .context("DATABASE_URL is required for the postgres backend")?;

                let pool = database::create_pool(&settings.database, url).await?;
                tracing::info!("Database connection pool created");

                if settings.database.run_migrations {
                    database::run_migrations(&pool).await?;
                    tracing::info!("Database migrations applied");
                }

                AppState::postgres(pool, settings.clone())
            }
        };

        if !settings.api_key.enabled {
            tracing::warn!("API key authentication is disabled");
        }

        let router = build_router(state);

        // Bind to address
        let addr: SocketAddr = settings
            .server_addr()
            .parse()
            .with_context(|| format!("Invalid server address {}", settings.server_addr()))?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
