//! Protection engine - the ingest pipeline
//!
//! One entry point per observed privileged action: record, evaluate the
//! rate, check exemptions, then hand violations to the executor. Recording
//! and enforcing are independent decisions: exempt actors still leave an
//! event trail.

use tracing::{debug, info, instrument, warn};

use guard_core::events::{ActionKind, SecurityEvent};
use guard_core::protection::ModerationCase;

use super::context::EngineContext;
use super::error::{EngineError, EngineResult};
use super::executor::PunishmentExecutor;
use super::limiter::ActionLimiter;
use super::whitelist::WhitelistService;

/// What ingesting one event led to
#[derive(Debug)]
pub enum IngestOutcome {
    /// Event recorded; the actor's rate is within bounds (or unmonitored)
    Recorded { count: i64 },
    /// Limit exceeded but the actor is whitelisted or an administrator
    Exempt { count: i64 },
    /// Limit exceeded and enforcement ran; `case` is `None` when the
    /// executor aborted on a precondition or the platform call failed
    Enforced { case: Option<ModerationCase> },
}

/// Protection engine: owns the context and exposes ingest
pub struct ProtectionEngine {
    ctx: EngineContext,
}

impl ProtectionEngine {
    /// Create a new ProtectionEngine
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Access the underlying context (for composing other services)
    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// Ingest one observed privileged action.
    ///
    /// The audit event source de-duplicates raw platform entries before
    /// calling this; `source_event_id` is only a safety net at the store.
    #[instrument(
        skip(self, event),
        fields(guild_id = %event.guild_id, actor_id = %event.actor_id, kind = %event.kind)
    )]
    pub async fn ingest(&self, event: SecurityEvent) -> EngineResult<IngestOutcome> {
        if !event.is_valid() {
            return Err(EngineError::validation("event missing guild or actor id"));
        }

        let decision = ActionLimiter::new(&self.ctx).record_and_check(&event).await?;

        if !decision.limit_exceeded {
            return Ok(IngestOutcome::Recorded {
                count: decision.count,
            });
        }

        // limit_exceeded is only ever set when a limit is configured
        let limit = decision.limit.ok_or_else(|| {
            EngineError::internal("limit exceeded without a configured limit")
        })?;

        if self.is_exempt(&event).await? {
            debug!(count = decision.count, "actor exempt, limit violation not enforced");
            return Ok(IngestOutcome::Exempt {
                count: decision.count,
            });
        }

        info!(count = decision.count, limit, "rate limit violated, enforcing");

        let executor = PunishmentExecutor::new(&self.ctx);
        let case = executor
            .execute_punishment(&event, decision.count, limit)
            .await?;

        self.run_cleanup_sweeps(&executor, &event).await;

        Ok(IngestOutcome::Enforced { case })
    }

    /// Administrators bypass enforcement by platform permission; everyone
    /// else is checked against the guild whitelist.
    async fn is_exempt(&self, event: &SecurityEvent) -> EngineResult<bool> {
        let member = self
            .ctx
            .gateway()
            .member(event.guild_id, event.actor_id)
            .await?;

        let role_ids = match member {
            Some(ref m) => {
                if m.is_administrator() {
                    return Ok(true);
                }
                m.role_ids.clone()
            }
            // Actor already gone; the executor will abort on its own,
            // but they are not exempt.
            None => Vec::new(),
        };

        WhitelistService::new(&self.ctx)
            .is_exempt(event.guild_id, event.actor_id, &role_ids, event.kind)
            .await
    }

    /// Category-specific cleanup after an enforcement attempt. Sweep
    /// failures are logged and never unwind the ingest call.
    async fn run_cleanup_sweeps(&self, executor: &PunishmentExecutor<'_>, event: &SecurityEvent) {
        match event.kind {
            ActionKind::AddBots => {
                if let Err(e) = executor.kick_recent_bots(event.guild_id, None).await {
                    warn!(error = %e, "recent-bot sweep failed");
                }
            }
            ActionKind::GiveAdminRole | ActionKind::DangerousPerms => {
                let Some(target_id) = event.target_id else {
                    debug!("no target on dangerous-permission event, skipping role strip");
                    return;
                };
                if let Err(e) = executor.remove_dangerous_roles(event.guild_id, target_id).await {
                    warn!(error = %e, "dangerous-role strip failed");
                }
            }
            _ => {}
        }
    }
}
