//! Settings service
//!
//! Admin CRUD for rate limits and punishment assignments. Validation lives
//! here so every write path (commands, future admin API) shares it.

use chrono::Duration;
use tracing::{info, instrument};

use guard_core::events::ActionKind;
use guard_core::protection::{Punishment, PunishmentKind, RateLimit};
use guard_core::value_objects::Snowflake;
use guard_core::DomainError;

use super::context::EngineContext;
use super::error::EngineResult;

/// Smallest accepted limit count
pub const MIN_LIMIT_COUNT: i32 = 1;
/// Largest accepted limit count
pub const MAX_LIMIT_COUNT: i32 = 100;
/// Smallest accepted window, in seconds
pub const MIN_WINDOW_SECONDS: i64 = 1;
/// Largest accepted window, in seconds
pub const MAX_WINDOW_SECONDS: i64 = 3600;
/// Largest accepted timeout duration (28 days, the platform ceiling)
pub const MAX_TIMEOUT_SECONDS: u32 = 28 * 24 * 3600;

/// Settings service
pub struct SettingsService<'a> {
    ctx: &'a EngineContext,
}

impl<'a> SettingsService<'a> {
    /// Create a new SettingsService
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// Upsert a rate limit for (guild, kind)
    #[instrument(skip(self))]
    pub async fn set_limit(
        &self,
        guild_id: Snowflake,
        kind: ActionKind,
        limit_count: i32,
        window: Duration,
    ) -> EngineResult<()> {
        if !(MIN_LIMIT_COUNT..=MAX_LIMIT_COUNT).contains(&limit_count) {
            return Err(DomainError::LimitOutOfRange(limit_count).into());
        }

        let window_seconds = window.num_seconds();
        if !(MIN_WINDOW_SECONDS..=MAX_WINDOW_SECONDS).contains(&window_seconds) {
            return Err(DomainError::WindowOutOfRange(window_seconds).into());
        }

        self.ctx
            .limits()
            .set_limit(guild_id, kind, RateLimit::per_seconds(limit_count, window_seconds))
            .await?;

        info!(guild_id = %guild_id, kind = %kind, limit_count, window_seconds, "Rate limit set");
        Ok(())
    }

    /// Remove a rate limit; the kind becomes unmonitored again
    #[instrument(skip(self))]
    pub async fn clear_limit(&self, guild_id: Snowflake, kind: ActionKind) -> EngineResult<bool> {
        let removed = self.ctx.limits().clear_limit(guild_id, kind).await?;
        if removed {
            info!(guild_id = %guild_id, kind = %kind, "Rate limit cleared");
        }
        Ok(removed)
    }

    /// All configured limits for a guild
    #[instrument(skip(self))]
    pub async fn limits(&self, guild_id: Snowflake) -> EngineResult<Vec<(ActionKind, RateLimit)>> {
        Ok(self.ctx.limits().limits(guild_id).await?)
    }

    /// Configured punishment for (guild, kind), if any
    #[instrument(skip(self))]
    pub async fn punishment(
        &self,
        guild_id: Snowflake,
        kind: ActionKind,
    ) -> EngineResult<Option<Punishment>> {
        Ok(self.ctx.limits().punishment(guild_id, kind).await?)
    }

    /// Upsert a punishment assignment for (guild, kind)
    #[instrument(skip(self))]
    pub async fn set_punishment(
        &self,
        guild_id: Snowflake,
        kind: ActionKind,
        punishment_kind: PunishmentKind,
        duration_seconds: Option<u32>,
    ) -> EngineResult<()> {
        match (punishment_kind, duration_seconds) {
            (PunishmentKind::Timeout, None) => {
                return Err(DomainError::TimeoutDurationRequired.into());
            }
            (PunishmentKind::Timeout, Some(duration)) => {
                if duration == 0 || duration > MAX_TIMEOUT_SECONDS {
                    return Err(DomainError::ValidationError(format!(
                        "timeout duration out of range: {duration}s (expected 1..={MAX_TIMEOUT_SECONDS})"
                    ))
                    .into());
                }
            }
            (_, Some(_)) => {
                return Err(DomainError::ValidationError(
                    "duration only applies to timeout punishments".to_string(),
                )
                .into());
            }
            (_, None) => {}
        }

        self.ctx
            .limits()
            .set_punishment(guild_id, kind, Punishment::new(punishment_kind, duration_seconds))
            .await?;

        info!(guild_id = %guild_id, kind = %kind, punishment = %punishment_kind, "Punishment set");
        Ok(())
    }

    /// Remove a punishment assignment; the default (ban) applies again
    #[instrument(skip(self))]
    pub async fn clear_punishment(
        &self,
        guild_id: Snowflake,
        kind: ActionKind,
    ) -> EngineResult<bool> {
        let removed = self.ctx.limits().clear_punishment(guild_id, kind).await?;
        if removed {
            info!(guild_id = %guild_id, kind = %kind, "Punishment cleared");
        }
        Ok(removed)
    }
}
