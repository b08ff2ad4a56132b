//! # guard-core
//!
//! Domain layer for the anti-nuke protection engine: value objects, the
//! protection data model, and the store/gateway traits the engine is built
//! against. This crate has zero dependencies on infrastructure (database,
//! chat-platform client, etc.).

pub mod error;
pub mod events;
pub mod protection;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use error::DomainError;
pub use events::{ActionKind, SecurityEvent};
pub use protection::{
    CaseMetadata, GuildView, MemberView, ModerationCase, NewCase, Punishment, PunishmentKind,
    RateLimit, TargetKind, WhitelistEntry, WhitelistScope,
};
pub use traits::{
    CaseStore, EventStore, LimitStore, NotificationSink, PlatformGateway, RepoResult,
    SecurityNotice, WhitelistStore,
};
pub use value_objects::{Permissions, Snowflake, SnowflakeParseError};
