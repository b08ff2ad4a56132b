//! Action limiter service
//!
//! Durable event recording plus sliding-window rate evaluation. The window
//! is anchored at each event's own timestamp rather than fixed clock
//! buckets, so an attacker cannot game bucket boundaries.

use chrono::{Duration, Utc};
use tracing::{debug, instrument};

use guard_core::events::{ActionKind, SecurityEvent};
use guard_core::value_objects::Snowflake;

use super::context::EngineContext;
use super::error::{EngineError, EngineResult};

/// Outcome of recording one event against the actor's configured limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitDecision {
    /// Events counted in the window, including the one just recorded
    pub count: i64,
    /// True when `count` strictly exceeds the configured limit
    pub limit_exceeded: bool,
    /// The configured limit count; `None` when the kind is unmonitored
    pub limit: Option<i32>,
}

/// Action limiter service
pub struct ActionLimiter<'a> {
    ctx: &'a EngineContext,
}

impl<'a> ActionLimiter<'a> {
    /// Create a new ActionLimiter
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// Record the event and evaluate the actor's rate over the window ending
    /// at the event's own timestamp.
    ///
    /// Recording is unconditional: events for unmonitored kinds are kept so
    /// counts are already accurate if a limit is configured later. The Nth
    /// action within the window is still allowed; the (N+1)th trips the
    /// limit.
    #[instrument(skip(self, event), fields(guild_id = %event.guild_id, actor_id = %event.actor_id, kind = %event.kind))]
    pub async fn record_and_check(&self, event: &SecurityEvent) -> EngineResult<LimitDecision> {
        if !event.is_valid() {
            return Err(EngineError::validation("event missing guild or actor id"));
        }

        self.ctx.events().record(event).await?;

        let Some(limit) = self
            .ctx
            .limits()
            .limit(event.guild_id, event.kind)
            .await?
        else {
            return Ok(LimitDecision {
                count: 1,
                limit_exceeded: false,
                limit: None,
            });
        };

        let window_start = event.occurred_at - limit.window;
        let count = self
            .ctx
            .events()
            .count_in_window(
                event.guild_id,
                event.actor_id,
                event.kind,
                window_start,
                event.occurred_at,
            )
            .await?;

        let limit_exceeded = count > i64::from(limit.limit_count);
        if limit_exceeded {
            debug!(count, limit = limit.limit_count, "rate limit exceeded");
        }

        Ok(LimitDecision {
            count,
            limit_exceeded,
            limit: Some(limit.limit_count),
        })
    }

    /// Read-only count over a window ending now, for status displays
    #[instrument(skip(self))]
    pub async fn action_count(
        &self,
        guild_id: Snowflake,
        actor_id: Snowflake,
        kind: ActionKind,
        window: Duration,
    ) -> EngineResult<i64> {
        let count = self
            .ctx
            .events()
            .count_since(guild_id, actor_id, kind, Utc::now() - window)
            .await?;
        Ok(count)
    }

    /// Most recent events for a guild, newest first
    #[instrument(skip(self))]
    pub async fn recent_actions(
        &self,
        guild_id: Snowflake,
        limit: i64,
    ) -> EngineResult<Vec<SecurityEvent>> {
        Ok(self.ctx.events().recent(guild_id, limit).await?)
    }

    /// Retention sweep: delete events older than the cutoff.
    /// Runs on its own schedule, never from the ingest path.
    #[instrument(skip(self))]
    pub async fn cleanup_old_actions(&self, older_than_days: u32) -> EngineResult<u64> {
        let cutoff = Utc::now() - Duration::days(i64::from(older_than_days));
        let deleted = self.ctx.events().delete_older_than(cutoff).await?;
        debug!(deleted, older_than_days, "retention sweep complete");
        Ok(deleted)
    }

    /// Drop all recorded events for a guild
    #[instrument(skip(self))]
    pub async fn clear_guild(&self, guild_id: Snowflake) -> EngineResult<()> {
        Ok(self.ctx.events().clear_guild(guild_id).await?)
    }
}
