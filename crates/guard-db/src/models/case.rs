//! Moderation case database model

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// Database model for moderation_cases table
#[derive(Debug, Clone, FromRow)]
pub struct ModerationCaseModel {
    pub guild_id: i64,
    /// Per-guild monotonically increasing case number
    pub case_number: i64,
    pub target_id: i64,
    pub moderator_id: i64,
    /// Punishment kind: BAN, KICK or TIMEOUT
    pub action: String,
    pub reason: String,
    /// JSON object with trigger kind, observed count and configured limit
    pub metadata: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}
