//! Security event database model

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// Database model for security_events table
#[derive(Debug, Clone, FromRow)]
pub struct SecurityEventModel {
    pub id: i64,
    pub guild_id: i64,
    pub actor_id: i64,
    /// Action kind stored as its SCREAMING_SNAKE_CASE string form
    pub kind: String,
    pub target_id: Option<i64>,
    /// Platform event id used for at-most-once recording
    pub source_event_id: Option<i64>,
    pub metadata: Option<JsonValue>,
    pub occurred_at: DateTime<Utc>,
}
