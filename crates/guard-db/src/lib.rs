//! # guard-db
//!
//! Database layer implementing the guard-core store traits with PostgreSQL
//! via SQLx: connection pool management, `FromRow` models and the repository
//! implementations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guard_db::{create_pool_from_env, PgEventRepository};
//! use guard_core::traits::EventStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool_from_env().await?;
//!     let events = PgEventRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, PgPool, PoolError};
pub use repositories::{
    PgCaseRepository, PgEventRepository, PgLimitRepository, PgWhitelistRepository,
};
