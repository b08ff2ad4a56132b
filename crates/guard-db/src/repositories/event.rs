//! PostgreSQL implementation of EventStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use guard_core::error::DomainError;
use guard_core::events::{ActionKind, SecurityEvent};
use guard_core::traits::{EventStore, RepoResult};
use guard_core::value_objects::Snowflake;

use crate::models::SecurityEventModel;

use super::error::{corrupt_row, map_db_error};

/// PostgreSQL implementation of EventStore
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    /// Create a new PgEventRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TryFrom<SecurityEventModel> for SecurityEvent {
    type Error = DomainError;

    fn try_from(model: SecurityEventModel) -> Result<Self, Self::Error> {
        let kind: ActionKind = model
            .kind
            .parse()
            .map_err(|_| corrupt_row("kind", &model.kind))?;

        Ok(SecurityEvent {
            guild_id: Snowflake::new(model.guild_id),
            actor_id: Snowflake::new(model.actor_id),
            kind,
            target_id: model.target_id.map(Snowflake::new),
            source_event_id: model.source_event_id.map(Snowflake::new),
            occurred_at: model.occurred_at,
            metadata: model.metadata,
        })
    }
}

#[async_trait]
impl EventStore for PgEventRepository {
    #[instrument(skip(self, event), fields(guild_id = %event.guild_id, actor_id = %event.actor_id, kind = %event.kind))]
    async fn record(&self, event: &SecurityEvent) -> RepoResult<()> {
        // The partial unique index on source_event_id makes redelivered
        // audit entries a no-op instead of a double count.
        sqlx::query(
            r"
            INSERT INTO security_events (guild_id, actor_id, kind, target_id, source_event_id, metadata, occurred_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (source_event_id) WHERE source_event_id IS NOT NULL DO NOTHING
            ",
        )
        .bind(event.guild_id.into_inner())
        .bind(event.actor_id.into_inner())
        .bind(event.kind.as_str())
        .bind(event.target_id.map(Snowflake::into_inner))
        .bind(event.source_event_id.map(Snowflake::into_inner))
        .bind(&event.metadata)
        .bind(event.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_in_window(
        &self,
        guild_id: Snowflake,
        actor_id: Snowflake,
        kind: ActionKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM security_events
            WHERE guild_id = $1 AND actor_id = $2 AND kind = $3
              AND occurred_at >= $4 AND occurred_at <= $5
            ",
        )
        .bind(guild_id.into_inner())
        .bind(actor_id.into_inner())
        .bind(kind.as_str())
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn count_since(
        &self,
        guild_id: Snowflake,
        actor_id: Snowflake,
        kind: ActionKind,
        start: DateTime<Utc>,
    ) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM security_events
            WHERE guild_id = $1 AND actor_id = $2 AND kind = $3
              AND occurred_at >= $4
            ",
        )
        .bind(guild_id.into_inner())
        .bind(actor_id.into_inner())
        .bind(kind.as_str())
        .bind(start)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn recent(&self, guild_id: Snowflake, limit: i64) -> RepoResult<Vec<SecurityEvent>> {
        let results = sqlx::query_as::<_, SecurityEventModel>(
            r"
            SELECT id, guild_id, actor_id, kind, target_id, source_event_id, metadata, occurred_at
            FROM security_events
            WHERE guild_id = $1
            ORDER BY occurred_at DESC
            LIMIT $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(SecurityEvent::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            DELETE FROM security_events WHERE occurred_at < $1
            ",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn clear_guild(&self, guild_id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            DELETE FROM security_events WHERE guild_id = $1
            ",
        )
        .bind(guild_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
