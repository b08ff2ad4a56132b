//! Platform gateway and notification ports
//!
//! The chat-platform client lives outside this workspace; the engine talks
//! to it through these traits. Gateway calls are expected to fail fast with
//! an error rather than hang - the executor treats any failure as
//! "apply punishment failed" and aborts without a case.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DomainError;
use crate::events::ActionKind;
use crate::protection::{GuildView, MemberView, PunishmentKind};
use crate::value_objects::Snowflake;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, DomainError>;

/// Live access to the chat platform, scoped to what enforcement needs
#[async_trait]
pub trait PlatformGateway: Send + Sync {
    /// The bot's own user id (the enforcing identity)
    fn bot_user_id(&self) -> Snowflake;

    /// Fetch a guild snapshot
    async fn guild(&self, guild_id: Snowflake) -> GatewayResult<GuildView>;

    /// Fetch a member; `None` when the user is no longer in the guild
    async fn member(&self, guild_id: Snowflake, user_id: Snowflake)
        -> GatewayResult<Option<MemberView>>;

    /// Fetch the bot's own member record in a guild
    async fn bot_member(&self, guild_id: Snowflake) -> GatewayResult<MemberView>;

    /// All current members (used by the recent-bot sweep)
    async fn members(&self, guild_id: Snowflake) -> GatewayResult<Vec<MemberView>>;

    /// Ban a member
    async fn ban(&self, guild_id: Snowflake, user_id: Snowflake, reason: &str) -> GatewayResult<()>;

    /// Kick a member
    async fn kick(&self, guild_id: Snowflake, user_id: Snowflake, reason: &str)
        -> GatewayResult<()>;

    /// Timeout a member until the given instant
    async fn timeout(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        until: DateTime<Utc>,
        reason: &str,
    ) -> GatewayResult<()>;

    /// Remove a role from a member (no-op when they don't hold it)
    async fn remove_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
        reason: &str,
    ) -> GatewayResult<()>;

    /// Permissions granted by one role (used to find dangerous roles)
    async fn role_permissions(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
    ) -> GatewayResult<crate::value_objects::Permissions>;
}

/// Human-readable summary of one enforcement, pushed to the security log
#[derive(Debug, Clone, Serialize)]
pub struct SecurityNotice {
    pub actor_id: Snowflake,
    pub actor_tag: String,
    pub trigger_kind: ActionKind,
    pub count: i64,
    pub limit: i32,
    pub punishment: PunishmentKind,
    pub case_number: i64,
}

/// Delivery of enforcement summaries to wherever the guild wants them
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Post a security-action summary for a guild. Failures are logged by
    /// the caller and never affect enforcement.
    async fn security_action(&self, guild_id: Snowflake, notice: SecurityNotice)
        -> GatewayResult<()>;
}
