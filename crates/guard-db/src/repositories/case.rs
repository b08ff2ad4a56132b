//! PostgreSQL implementation of CaseStore

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use guard_core::error::DomainError;
use guard_core::protection::{CaseMetadata, ModerationCase, NewCase, PunishmentKind};
use guard_core::traits::{CaseStore, RepoResult};
use guard_core::value_objects::Snowflake;

use crate::models::ModerationCaseModel;

use super::error::{corrupt_row, map_db_error};

/// PostgreSQL implementation of CaseStore
#[derive(Clone)]
pub struct PgCaseRepository {
    pool: PgPool,
}

impl PgCaseRepository {
    /// Create a new PgCaseRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TryFrom<ModerationCaseModel> for ModerationCase {
    type Error = DomainError;

    fn try_from(model: ModerationCaseModel) -> Result<Self, Self::Error> {
        let action: PunishmentKind = model
            .action
            .parse()
            .map_err(|_| corrupt_row("action", &model.action))?;

        let metadata = model
            .metadata
            .map(serde_json::from_value::<CaseMetadata>)
            .transpose()
            .map_err(|e| DomainError::InternalError(format!("unreadable case metadata: {e}")))?;

        Ok(ModerationCase {
            guild_id: Snowflake::new(model.guild_id),
            case_number: model.case_number,
            target_id: Snowflake::new(model.target_id),
            moderator_id: Snowflake::new(model.moderator_id),
            action,
            reason: model.reason,
            metadata,
            created_at: model.created_at,
        })
    }
}

#[async_trait]
impl CaseStore for PgCaseRepository {
    /// Insert the case inside a transaction that bumps the per-guild counter,
    /// so concurrent punishments in one guild never collide on a number.
    #[instrument(skip(self, case), fields(guild_id = %case.guild_id, target_id = %case.target_id))]
    async fn create(&self, case: NewCase) -> RepoResult<ModerationCase> {
        let metadata = case
            .metadata
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| DomainError::InternalError(format!("unserializable case metadata: {e}")))?;

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let case_number = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO case_counters (guild_id, next_case)
            VALUES ($1, 1)
            ON CONFLICT (guild_id)
            DO UPDATE SET next_case = case_counters.next_case + 1
            RETURNING next_case
            ",
        )
        .bind(case.guild_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let model = sqlx::query_as::<_, ModerationCaseModel>(
            r"
            INSERT INTO moderation_cases (guild_id, case_number, target_id, moderator_id, action, reason, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING guild_id, case_number, target_id, moderator_id, action, reason, metadata, created_at
            ",
        )
        .bind(case.guild_id.into_inner())
        .bind(case_number)
        .bind(case.target_id.into_inner())
        .bind(case.moderator_id.into_inner())
        .bind(case.action.as_str())
        .bind(&case.reason)
        .bind(metadata)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        ModerationCase::try_from(model)
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        guild_id: Snowflake,
        case_number: i64,
    ) -> RepoResult<Option<ModerationCase>> {
        let result = sqlx::query_as::<_, ModerationCaseModel>(
            r"
            SELECT guild_id, case_number, target_id, moderator_id, action, reason, metadata, created_at
            FROM moderation_cases
            WHERE guild_id = $1 AND case_number = $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(case_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ModerationCase::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn for_guild(&self, guild_id: Snowflake, limit: i64) -> RepoResult<Vec<ModerationCase>> {
        let results = sqlx::query_as::<_, ModerationCaseModel>(
            r"
            SELECT guild_id, case_number, target_id, moderator_id, action, reason, metadata, created_at
            FROM moderation_cases
            WHERE guild_id = $1
            ORDER BY case_number DESC
            LIMIT $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(ModerationCase::try_from).collect()
    }
}
