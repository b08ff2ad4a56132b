//! Detection and enforcement services
//!
//! This module contains the service layer: the ingest pipeline, the
//! sliding-window limiter, the punishment executor and the admin surfaces
//! for limits and whitelists.

pub mod context;
pub mod error;
pub mod executor;
pub mod limiter;
pub mod protection;
pub mod settings;
pub mod whitelist;

// Re-export all services for convenience
pub use context::{EngineContext, EngineContextBuilder};
pub use error::{EngineError, EngineResult};
pub use executor::PunishmentExecutor;
pub use limiter::{ActionLimiter, LimitDecision};
pub use protection::{IngestOutcome, ProtectionEngine};
pub use settings::SettingsService;
pub use whitelist::WhitelistService;
