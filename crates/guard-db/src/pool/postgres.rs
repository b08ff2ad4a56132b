//! PostgreSQL connection pool management
//!
//! Connection counts come from `guard_common` configuration; the timeout
//! knobs are fixed here because nothing in the engine needs to tune them.

use guard_common::config::{AppConfig, DatabaseConfig};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Maximum time to wait for a connection
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum idle time before a connection is closed
const IDLE_TIMEOUT: Duration = Duration::from_secs(300);
/// Maximum lifetime of a connection
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Errors from pool construction
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("configuration error: {0}")]
    Config(#[from] guard_common::config::ConfigError),

    #[error("database connection error: {0}")]
    Connect(#[from] sqlx::Error),
}

/// Create a new PostgreSQL connection pool from database configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .connect(&config.url)
        .await
}

/// Load configuration from the environment and connect
pub async fn create_pool_from_env() -> Result<PgPool, PoolError> {
    let config = AppConfig::from_env()?;
    Ok(create_pool(&config.database).await?)
}
