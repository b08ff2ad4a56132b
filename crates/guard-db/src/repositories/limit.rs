//! PostgreSQL implementation of LimitStore

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use guard_core::error::DomainError;
use guard_core::events::ActionKind;
use guard_core::protection::{Punishment, PunishmentKind, RateLimit};
use guard_core::traits::{LimitStore, RepoResult};
use guard_core::value_objects::Snowflake;

use crate::models::{PunishmentModel, RateLimitModel};

use super::error::{corrupt_row, map_db_error};

/// PostgreSQL implementation of LimitStore
#[derive(Clone)]
pub struct PgLimitRepository {
    pool: PgPool,
}

impl PgLimitRepository {
    /// Create a new PgLimitRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<RateLimitModel> for RateLimit {
    fn from(model: RateLimitModel) -> Self {
        RateLimit::per_seconds(model.limit_count, model.window_seconds)
    }
}

impl TryFrom<PunishmentModel> for Punishment {
    type Error = DomainError;

    fn try_from(model: PunishmentModel) -> Result<Self, Self::Error> {
        let kind: PunishmentKind = model
            .punishment
            .parse()
            .map_err(|_| corrupt_row("punishment", &model.punishment))?;

        let duration_seconds = model.duration_seconds.and_then(|d| u32::try_from(d).ok());
        Ok(Punishment::new(kind, duration_seconds))
    }
}

#[async_trait]
impl LimitStore for PgLimitRepository {
    #[instrument(skip(self))]
    async fn limit(&self, guild_id: Snowflake, kind: ActionKind) -> RepoResult<Option<RateLimit>> {
        let result = sqlx::query_as::<_, RateLimitModel>(
            r"
            SELECT guild_id, kind, limit_count, window_seconds, updated_at
            FROM action_limits
            WHERE guild_id = $1 AND kind = $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RateLimit::from))
    }

    #[instrument(skip(self))]
    async fn set_limit(
        &self,
        guild_id: Snowflake,
        kind: ActionKind,
        limit: RateLimit,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO action_limits (guild_id, kind, limit_count, window_seconds)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (guild_id, kind)
            DO UPDATE SET limit_count = $3, window_seconds = $4, updated_at = NOW()
            ",
        )
        .bind(guild_id.into_inner())
        .bind(kind.as_str())
        .bind(limit.limit_count)
        .bind(limit.window.num_seconds())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_limit(&self, guild_id: Snowflake, kind: ActionKind) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM action_limits WHERE guild_id = $1 AND kind = $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn limits(&self, guild_id: Snowflake) -> RepoResult<Vec<(ActionKind, RateLimit)>> {
        let results = sqlx::query_as::<_, RateLimitModel>(
            r"
            SELECT guild_id, kind, limit_count, window_seconds, updated_at
            FROM action_limits
            WHERE guild_id = $1
            ORDER BY kind
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results
            .into_iter()
            .map(|model| {
                let kind: ActionKind = model
                    .kind
                    .parse()
                    .map_err(|_| corrupt_row("kind", &model.kind))?;
                Ok((kind, RateLimit::from(model)))
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn punishment(
        &self,
        guild_id: Snowflake,
        kind: ActionKind,
    ) -> RepoResult<Option<Punishment>> {
        let result = sqlx::query_as::<_, PunishmentModel>(
            r"
            SELECT guild_id, kind, punishment, duration_seconds, updated_at
            FROM punishments
            WHERE guild_id = $1 AND kind = $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Punishment::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn set_punishment(
        &self,
        guild_id: Snowflake,
        kind: ActionKind,
        punishment: Punishment,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO punishments (guild_id, kind, punishment, duration_seconds)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (guild_id, kind)
            DO UPDATE SET punishment = $3, duration_seconds = $4, updated_at = NOW()
            ",
        )
        .bind(guild_id.into_inner())
        .bind(kind.as_str())
        .bind(punishment.kind.as_str())
        .bind(punishment.duration_seconds.map(i64::from))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_punishment(&self, guild_id: Snowflake, kind: ActionKind) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM punishments WHERE guild_id = $1 AND kind = $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
