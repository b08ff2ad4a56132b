//! # guard-engine
//!
//! Application layer of the anti-nuke protection engine: the ingest
//! pipeline, sliding-window action limiter, whitelist checks, the
//! concurrency-safe punishment executor and the retention sweeper.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guard_engine::services::{EngineContextBuilder, ProtectionEngine};
//!
//! let ctx = EngineContextBuilder::new()
//!     .events(events)
//!     .limits(limits)
//!     .whitelist(whitelist)
//!     .cases(cases)
//!     .gateway(gateway)
//!     .notifier(notifier)
//!     .build()?;
//!
//! let engine = ProtectionEngine::new(ctx);
//! engine.ingest(event).await?;
//! ```

pub mod lock;
pub mod services;
pub mod sweep;

// Re-export the main surface
pub use lock::{EnforcementGuard, EnforcementLocks};
pub use services::{
    ActionLimiter, EngineContext, EngineContextBuilder, EngineError, EngineResult, IngestOutcome,
    LimitDecision, ProtectionEngine, PunishmentExecutor, SettingsService, WhitelistService,
};
pub use sweep::RetentionSweeper;
