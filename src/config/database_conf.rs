use std::env;
use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use tracing::{debug, info};

use crate::config::ConfigError;

pub type DbPool = sqlx::SqlitePool;

/// Relational store configuration (SQLite through sqlx).
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite://data/atelier.db?mode=rwc`
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading database configuration from environment variables");

        let url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::EnvVarNotFound("DATABASE_URL".to_string()))?;
        debug!("Database URL: {}", url);

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .map_err(|_| {
                ConfigError::InvalidValue("Invalid DATABASE_MAX_CONNECTIONS value".to_string())
            })?;

        let acquire_timeout_secs = env::var("DATABASE_ACQUIRE_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("Invalid DATABASE_ACQUIRE_TIMEOUT value".to_string())
            })?;

        let config = DatabaseConfig { url, max_connections, acquire_timeout_secs };
        config.validate()?;
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_secs: 5,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::ValidationError("Database URL cannot be empty".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "Database pool size cannot be 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the process-wide connection pool. Constructed once at startup
    /// and injected into repositories.
    pub async fn connect(&self) -> Result<DbPool, sqlx::Error> {
        SqlitePoolOptions::new()
            .max_connections(self.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs.max(1)))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await?;
                    sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                    sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
                    Ok(())
                })
            })
            .connect(&self.url)
            .await
    }
}
