//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Which repository implementation backs the service
    pub storage: StorageSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// API key authentication settings
    pub api_key: ApiKeySettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Category analytics tuning
    pub analytics: AnalyticsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// Repository backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryBackend {
    /// Process-local storage, lost on restart
    Memory,
    /// PostgreSQL via sqlx
    Postgres,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: RepositoryBackend,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL, required by the postgres backend
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,

    /// Apply pending migrations at startup
    pub run_migrations: bool,
}

/// API key authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySettings {
    /// Reject requests without a valid key
    pub enabled: bool,

    /// Request header carrying the key
    pub header_name: String,

    /// The accepted key
    pub key: String,

    /// Path prefixes that skip authentication
    pub exempt_paths: Vec<String>,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// Category analytics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsSettings {
    /// Products at or below this quantity (and above zero) count as low stock
    pub low_stock_threshold: i32,

    /// Trend window used when a request does not specify one
    pub default_trend_days: i64,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the loaded values are inconsistent (see [`Settings::validate`]).
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        let settings: Self = Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5126)?
            .set_default("storage.backend", "memory")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("database.run_migrations", true)?
            .set_default("api_key.enabled", true)?
            .set_default("api_key.header_name", "X-API-Key")?
            .set_default("api_key.key", "")?
            .set_default("api_key.exempt_paths", vec!["/health", "/metrics", "/swagger"])?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            .set_default("analytics.low_stock_threshold", 10)?
            .set_default("analytics.default_trend_days", 30)?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=5126 -> server.port = 5126
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .with_list_parse_key("api_key.exempt_paths")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("api_key.key", std::env::var("API_KEY").ok())?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check cross-field requirements the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.enabled && self.api_key.key.trim().is_empty() {
            return Err(ConfigError::Message(
                "API key authentication is enabled but no key is configured (set API_KEY)".into(),
            ));
        }
        if self.api_key.header_name.trim().is_empty() {
            return Err(ConfigError::Message("api_key.header_name cannot be empty".into()));
        }
        if self.storage.backend == RepositoryBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::Message(
                "The postgres storage backend requires DATABASE_URL".into(),
            ));
        }
        if self.analytics.low_stock_threshold < 0 {
            return Err(ConfigError::Message(
                "analytics.low_stock_threshold cannot be negative".into(),
            ));
        }
        if !(1..=365).contains(&self.analytics.default_trend_days) {
            return Err(ConfigError::Message(
                "analytics.default_trend_days must be between 1 and 365".into(),
            ));
        }
        Ok(())
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    /// In-memory storage with authentication enabled and an empty key;
    /// callers set `api_key.key` before use.
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".into(),
                port: 5126,
            },
            storage: StorageSettings {
                backend: RepositoryBackend::Memory,
            },
            database: DatabaseSettings {
                url: None,
                max_connections: 10,
                min_connections: 2,
                acquire_timeout: 30,
                run_migrations: true,
            },
            api_key: ApiKeySettings {
                enabled: true,
                header_name: "X-API-Key".into(),
                key: String::new(),
                exempt_paths: vec!["/health".into(), "/metrics".into(), "/swagger".into()],
            },
            cors: CorsSettings {
                allowed_origins: vec!["http://localhost:3000".into()],
            },
            analytics: AnalyticsSettings {
                low_stock_threshold: 10,
                default_trend_days: 30,
            },
            environment: "development".into(),
        }
    }
}
