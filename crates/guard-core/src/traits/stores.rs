//! Store traits (ports) - define the interface for persistent state
//!
//! The domain layer defines what it needs; the infrastructure layer
//! (guard-db for PostgreSQL, fakes in tests) provides the implementation.
//! The engine only ever reads limits and whitelist entries - they are
//! written by administrator commands through the same traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::events::{ActionKind, SecurityEvent};
use crate::protection::{ModerationCase, NewCase, Punishment, RateLimit, WhitelistEntry, WhitelistScope};
use crate::value_objects::Snowflake;

/// Result type for store operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Event Store
// ============================================================================

/// Durable record of observed privileged actions, supporting the sliding
/// window counts. Failures must propagate: a count that silently defaults
/// to zero is a detection blind spot.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist one observed event
    async fn record(&self, event: &SecurityEvent) -> RepoResult<()>;

    /// Count events for (guild, actor, kind) with `occurred_at` in
    /// `[start, end]`, both ends inclusive
    async fn count_in_window(
        &self,
        guild_id: Snowflake,
        actor_id: Snowflake,
        kind: ActionKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<i64>;

    /// Count events for (guild, actor, kind) from `start` to now
    async fn count_since(
        &self,
        guild_id: Snowflake,
        actor_id: Snowflake,
        kind: ActionKind,
        start: DateTime<Utc>,
    ) -> RepoResult<i64>;

    /// Most recent events for a guild, newest first
    async fn recent(&self, guild_id: Snowflake, limit: i64) -> RepoResult<Vec<SecurityEvent>>;

    /// Delete events older than the cutoff; returns the number deleted
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> RepoResult<u64>;

    /// Delete all recorded events for a guild
    async fn clear_guild(&self, guild_id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Limit Store (rate limits + punishment assignments)
// ============================================================================

#[async_trait]
pub trait LimitStore: Send + Sync {
    /// Configured rate limit for (guild, kind); `None` means unmonitored
    async fn limit(&self, guild_id: Snowflake, kind: ActionKind) -> RepoResult<Option<RateLimit>>;

    /// Upsert a rate limit
    async fn set_limit(
        &self,
        guild_id: Snowflake,
        kind: ActionKind,
        limit: RateLimit,
    ) -> RepoResult<()>;

    /// Remove a rate limit; returns whether one existed
    async fn clear_limit(&self, guild_id: Snowflake, kind: ActionKind) -> RepoResult<bool>;

    /// All configured limits for a guild
    async fn limits(&self, guild_id: Snowflake) -> RepoResult<Vec<(ActionKind, RateLimit)>>;

    /// Configured punishment for (guild, kind); `None` falls back to the
    /// engine default
    async fn punishment(
        &self,
        guild_id: Snowflake,
        kind: ActionKind,
    ) -> RepoResult<Option<Punishment>>;

    /// Upsert a punishment assignment
    async fn set_punishment(
        &self,
        guild_id: Snowflake,
        kind: ActionKind,
        punishment: Punishment,
    ) -> RepoResult<()>;

    /// Remove a punishment assignment; returns whether one existed
    async fn clear_punishment(&self, guild_id: Snowflake, kind: ActionKind) -> RepoResult<bool>;
}

// ============================================================================
// Whitelist Store
// ============================================================================

#[async_trait]
pub trait WhitelistStore: Send + Sync {
    /// All whitelist entries for a guild
    async fn entries(&self, guild_id: Snowflake) -> RepoResult<Vec<WhitelistEntry>>;

    /// Add an entry (idempotent on the (target, scope) pair)
    async fn add(&self, guild_id: Snowflake, entry: WhitelistEntry) -> RepoResult<()>;

    /// Remove an entry; returns whether one existed
    async fn remove(
        &self,
        guild_id: Snowflake,
        target: Snowflake,
        scope: WhitelistScope,
    ) -> RepoResult<bool>;
}

// ============================================================================
// Case Store
// ============================================================================

/// Append-only ledger of punishment actions. Implementations must assign
/// `case_number` with a per-guild atomic increment so concurrent inserts
/// never collide.
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Persist a case, assigning the next per-guild case number
    async fn create(&self, case: NewCase) -> RepoResult<ModerationCase>;

    /// Look up one case by guild and number
    async fn find(&self, guild_id: Snowflake, case_number: i64) -> RepoResult<Option<ModerationCase>>;

    /// Most recent cases for a guild, newest first
    async fn for_guild(&self, guild_id: Snowflake, limit: i64) -> RepoResult<Vec<ModerationCase>>;
}
