//! Moderation cases - the append-only ledger of enforcement actions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::ActionKind;
use crate::protection::PunishmentKind;
use crate::value_objects::Snowflake;

/// Context recorded alongside an automated punishment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseMetadata {
    /// The action kind whose rate limit fired
    pub trigger_kind: ActionKind,
    /// Actions counted in the window when the limit fired
    pub count: i64,
    /// The configured limit that was exceeded
    pub limit: i32,
    /// Audit-log entry the triggering event was derived from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_event_id: Option<Snowflake>,
}

/// A case not yet persisted; the store assigns the per-guild case number
#[derive(Debug, Clone)]
pub struct NewCase {
    pub guild_id: Snowflake,
    /// The punished actor
    pub target_id: Snowflake,
    /// The enforcing identity (the bot user for automated punishments)
    pub moderator_id: Snowflake,
    pub action: PunishmentKind,
    pub reason: String,
    pub metadata: Option<CaseMetadata>,
}

/// A persisted case record
#[derive(Debug, Clone)]
pub struct ModerationCase {
    pub guild_id: Snowflake,
    /// Monotonic per guild, assigned atomically on insert
    pub case_number: i64,
    pub target_id: Snowflake,
    pub moderator_id: Snowflake,
    pub action: PunishmentKind,
    pub reason: String,
    pub metadata: Option<CaseMetadata>,
    pub created_at: DateTime<Utc>,
}
