//! Punishment executor service
//!
//! Decides, deduplicates, validates and applies enforcement. The lock table
//! gives at-most-one in-flight enforcement per (guild, actor); its guard is
//! dropped on every exit path, so no failure can leave a stale lock behind.

use chrono::{Duration, Utc};
use tracing::{debug, error, info, instrument, warn};

use guard_core::events::SecurityEvent;
use guard_core::protection::{
    CaseMetadata, MemberView, ModerationCase, NewCase, Punishment, PunishmentKind,
};
use guard_core::traits::SecurityNotice;
use guard_core::value_objects::Snowflake;

use super::context::EngineContext;
use super::error::EngineResult;

/// How far back the bot sweep looks for freshly added bots
const RECENT_BOT_WINDOW: Duration = Duration::minutes(5);

/// Punishment executor service
pub struct PunishmentExecutor<'a> {
    ctx: &'a EngineContext,
}

impl<'a> PunishmentExecutor<'a> {
    /// Create a new PunishmentExecutor
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// Enforce against the actor of a rate-limit violation.
    ///
    /// Returns the created case, or `None` for every non-error abort path:
    /// concurrent enforcement already in flight, actor gone, owner,
    /// hierarchy or bot-permission precondition failed, or the platform
    /// call to apply the punishment failed (logged, not retried).
    #[instrument(
        skip(self, event),
        fields(guild_id = %event.guild_id, actor_id = %event.actor_id, kind = %event.kind)
    )]
    pub async fn execute_punishment(
        &self,
        event: &SecurityEvent,
        count: i64,
        limit: i32,
    ) -> EngineResult<Option<ModerationCase>> {
        let Some(_guard) = self
            .ctx
            .locks()
            .try_acquire(event.guild_id, event.actor_id)
        else {
            debug!("enforcement already in flight for actor, skipping");
            return Ok(None);
        };

        // Unconfigured punishment falls back to BAN: the limit firing is
        // itself evidence of abuse, so doing nothing is not an option.
        let punishment = self
            .ctx
            .limits()
            .punishment(event.guild_id, event.kind)
            .await?
            .unwrap_or_else(Punishment::fallback);

        let Some(actor) = self
            .ctx
            .gateway()
            .member(event.guild_id, event.actor_id)
            .await?
        else {
            debug!("actor is no longer a guild member, nothing to punish");
            return Ok(None);
        };

        let guild = self.ctx.gateway().guild(event.guild_id).await?;
        if guild.is_owner(event.actor_id) {
            debug!("actor is the guild owner, never punished");
            return Ok(None);
        }

        let bot = self.ctx.gateway().bot_member(event.guild_id).await?;
        let required = punishment.kind.required_permission();
        if !bot.permissions.has(required) {
            warn!(
                permission = ?required,
                "bot lacks the permission for the configured punishment, aborting"
            );
            return Ok(None);
        }

        // Platforms refuse moderation against equal or higher roles; abort
        // cleanly instead of burning a doomed API call.
        if actor.outranks_or_ties(&bot) {
            warn!(
                actor_position = actor.highest_role_position,
                bot_position = bot.highest_role_position,
                "role hierarchy prevents enforcement against actor"
            );
            return Ok(None);
        }

        let reason = format!(
            "Anti-Nuke: {} limit exceeded ({count}/{limit})",
            event.kind.display_name()
        );

        if let Err(e) = self.apply(event, punishment, &reason).await {
            error!(error = %e, applied = %punishment.kind, "failed to apply punishment");
            return Ok(None);
        }

        info!(applied = %punishment.kind, count, limit, "punishment applied");

        let new_case = NewCase {
            guild_id: event.guild_id,
            target_id: event.actor_id,
            moderator_id: self.ctx.gateway().bot_user_id(),
            action: punishment.kind,
            reason,
            metadata: Some(CaseMetadata {
                trigger_kind: event.kind,
                count,
                limit,
                source_event_id: event.source_event_id,
            }),
        };

        let case = match self.ctx.cases().create(new_case).await {
            Ok(case) => case,
            Err(e) => {
                // The punishment stands; an incomplete ledger beats undoing
                // a protective action.
                error!(error = %e, "punishment applied but case record failed");
                return Ok(None);
            }
        };

        self.notify(event, &actor, punishment.kind, count, limit, &case)
            .await;

        Ok(Some(case))
    }

    async fn apply(
        &self,
        event: &SecurityEvent,
        punishment: Punishment,
        reason: &str,
    ) -> EngineResult<()> {
        let gateway = self.ctx.gateway();
        match punishment.kind {
            PunishmentKind::Ban => {
                gateway.ban(event.guild_id, event.actor_id, reason).await?;
            }
            PunishmentKind::Kick => {
                gateway.kick(event.guild_id, event.actor_id, reason).await?;
            }
            PunishmentKind::Timeout => {
                let until = Utc::now() + Duration::seconds(i64::from(punishment.timeout_seconds()));
                gateway
                    .timeout(event.guild_id, event.actor_id, until, reason)
                    .await?;
            }
        }
        Ok(())
    }

    async fn notify(
        &self,
        event: &SecurityEvent,
        actor: &MemberView,
        punishment: PunishmentKind,
        count: i64,
        limit: i32,
        case: &ModerationCase,
    ) {
        let notice = SecurityNotice {
            actor_id: event.actor_id,
            actor_tag: actor.tag.clone(),
            trigger_kind: event.kind,
            count,
            limit,
            punishment,
            case_number: case.case_number,
        };

        if let Err(e) = self
            .ctx
            .notifier()
            .security_action(event.guild_id, notice)
            .await
        {
            warn!(error = %e, "security notification delivery failed");
        }
    }

    /// Kick every bot that joined within the last five minutes, excluding
    /// the enforcing bot itself and one optionally exempted bot id.
    /// Returns the number of bots removed.
    #[instrument(skip(self))]
    pub async fn kick_recent_bots(
        &self,
        guild_id: Snowflake,
        except: Option<Snowflake>,
    ) -> EngineResult<u64> {
        let gateway = self.ctx.gateway();
        let cutoff = Utc::now() - RECENT_BOT_WINDOW;
        let bot_id = gateway.bot_user_id();

        let mut kicked = 0;
        for member in gateway.members(guild_id).await? {
            if !member.is_bot || member.joined_at < cutoff {
                continue;
            }
            if member.user_id == bot_id || Some(member.user_id) == except {
                continue;
            }

            match gateway
                .kick(guild_id, member.user_id, "Anti-Nuke: recently added bot removed")
                .await
            {
                Ok(()) => {
                    info!(bot_id = %member.user_id, "recently added bot kicked");
                    kicked += 1;
                }
                Err(e) => {
                    warn!(bot_id = %member.user_id, error = %e, "failed to kick recent bot");
                }
            }
        }

        Ok(kicked)
    }

    /// Strip every role held by the user that grants administrative-equivalent
    /// capability. Removing a role the user no longer holds is a no-op at the
    /// gateway. Returns the number of roles removed.
    #[instrument(skip(self))]
    pub async fn remove_dangerous_roles(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> EngineResult<u64> {
        let gateway = self.ctx.gateway();

        let Some(member) = gateway.member(guild_id, user_id).await? else {
            debug!("user is no longer a guild member, no roles to strip");
            return Ok(0);
        };

        let mut removed = 0;
        for role_id in &member.role_ids {
            let permissions = gateway.role_permissions(guild_id, *role_id).await?;
            if !permissions.is_dangerous() {
                continue;
            }

            match gateway
                .remove_role(guild_id, user_id, *role_id, "Anti-Nuke: dangerous role stripped")
                .await
            {
                Ok(()) => {
                    info!(role_id = %role_id, "dangerous role stripped");
                    removed += 1;
                }
                Err(e) => {
                    warn!(role_id = %role_id, error = %e, "failed to strip dangerous role");
                }
            }
        }

        Ok(removed)
    }
}
