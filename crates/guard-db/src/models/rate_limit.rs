//! Rate limit database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for action_limits table
#[derive(Debug, Clone, FromRow)]
pub struct RateLimitModel {
    pub guild_id: i64,
    /// Action kind stored as its SCREAMING_SNAKE_CASE string form
    pub kind: String,
    pub limit_count: i32,
    pub window_seconds: i64,
    pub updated_at: DateTime<Utc>,
}
