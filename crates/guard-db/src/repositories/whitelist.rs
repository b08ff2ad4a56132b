//! PostgreSQL implementation of WhitelistStore

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use guard_core::error::DomainError;
use guard_core::protection::{TargetKind, WhitelistEntry, WhitelistScope};
use guard_core::traits::{RepoResult, WhitelistStore};
use guard_core::value_objects::Snowflake;

use crate::models::WhitelistEntryModel;

use super::error::{corrupt_row, map_db_error};

/// PostgreSQL implementation of WhitelistStore
#[derive(Clone)]
pub struct PgWhitelistRepository {
    pool: PgPool,
}

impl PgWhitelistRepository {
    /// Create a new PgWhitelistRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TryFrom<WhitelistEntryModel> for WhitelistEntry {
    type Error = DomainError;

    fn try_from(model: WhitelistEntryModel) -> Result<Self, Self::Error> {
        let target_kind = match model.target_kind.as_str() {
            "USER" => TargetKind::User,
            "ROLE" => TargetKind::Role,
            other => return Err(corrupt_row("target_kind", other)),
        };

        let scope = WhitelistScope::parse(&model.scope)
            .ok_or_else(|| corrupt_row("scope", &model.scope))?;

        Ok(WhitelistEntry {
            target: Snowflake::new(model.target_id),
            target_kind,
            scope,
        })
    }
}

#[async_trait]
impl WhitelistStore for PgWhitelistRepository {
    #[instrument(skip(self))]
    async fn entries(&self, guild_id: Snowflake) -> RepoResult<Vec<WhitelistEntry>> {
        let results = sqlx::query_as::<_, WhitelistEntryModel>(
            r"
            SELECT guild_id, target_id, target_kind, scope, created_at
            FROM whitelist_entries
            WHERE guild_id = $1
            ORDER BY created_at
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(WhitelistEntry::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn add(&self, guild_id: Snowflake, entry: WhitelistEntry) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO whitelist_entries (guild_id, target_id, target_kind, scope)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (guild_id, target_id, scope) DO UPDATE SET target_kind = $3
            ",
        )
        .bind(guild_id.into_inner())
        .bind(entry.target.into_inner())
        .bind(entry.target_kind.as_str())
        .bind(entry.scope.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(
        &self,
        guild_id: Snowflake,
        target: Snowflake,
        scope: WhitelistScope,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM whitelist_entries
            WHERE guild_id = $1 AND target_id = $2 AND scope = $3
            ",
        )
        .bind(guild_id.into_inner())
        .bind(target.into_inner())
        .bind(scope.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
