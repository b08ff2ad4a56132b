//! Repository implementations
//!
//! PostgreSQL implementations of the store traits defined in guard-core.
//! Each repository handles database operations for one protection concern.

mod case;
mod error;
mod event;
mod limit;
mod whitelist;

pub use case::PgCaseRepository;
pub use event::PgEventRepository;
pub use limit::PgLimitRepository;
pub use whitelist::PgWhitelistRepository;
