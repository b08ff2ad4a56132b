//! Whitelist service
//!
//! Exemption queries plus the admin CRUD surface for whitelist entries.

use tracing::{info, instrument};

use guard_core::events::ActionKind;
use guard_core::protection::{WhitelistEntry, WhitelistScope};
use guard_core::value_objects::Snowflake;

use super::context::EngineContext;
use super::error::EngineResult;

/// Whitelist service
pub struct WhitelistService<'a> {
    ctx: &'a EngineContext,
}

impl<'a> WhitelistService<'a> {
    /// Create a new WhitelistService
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// True when any entry exempts the actor (by id or held role) from
    /// enforcement of `kind`. Failures propagate: defaulting to "not exempt"
    /// on a store error would punish users the guild explicitly trusts.
    #[instrument(skip(self, actor_role_ids))]
    pub async fn is_exempt(
        &self,
        guild_id: Snowflake,
        actor_id: Snowflake,
        actor_role_ids: &[Snowflake],
        kind: ActionKind,
    ) -> EngineResult<bool> {
        let entries = self.ctx.whitelist().entries(guild_id).await?;
        Ok(entries
            .iter()
            .any(|entry| entry.matches(actor_id, actor_role_ids, kind)))
    }

    /// All entries for a guild
    #[instrument(skip(self))]
    pub async fn entries(&self, guild_id: Snowflake) -> EngineResult<Vec<WhitelistEntry>> {
        Ok(self.ctx.whitelist().entries(guild_id).await?)
    }

    /// Add an exemption; idempotent on the (target, scope) pair
    #[instrument(skip(self))]
    pub async fn add(&self, guild_id: Snowflake, entry: WhitelistEntry) -> EngineResult<()> {
        self.ctx.whitelist().add(guild_id, entry).await?;

        info!(
            guild_id = %guild_id,
            target = %entry.target,
            scope = entry.scope.as_str(),
            "Whitelist entry added"
        );
        Ok(())
    }

    /// Remove an exemption; returns whether one existed
    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        guild_id: Snowflake,
        target: Snowflake,
        scope: WhitelistScope,
    ) -> EngineResult<bool> {
        let removed = self.ctx.whitelist().remove(guild_id, target, scope).await?;

        if removed {
            info!(guild_id = %guild_id, target = %target, scope = scope.as_str(), "Whitelist entry removed");
        }
        Ok(removed)
    }
}
