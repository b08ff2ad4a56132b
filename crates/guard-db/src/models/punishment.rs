//! Punishment configuration database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for punishments table
#[derive(Debug, Clone, FromRow)]
pub struct PunishmentModel {
    pub guild_id: i64,
    /// Action kind stored as its SCREAMING_SNAKE_CASE string form
    pub kind: String,
    /// Punishment kind: BAN, KICK or TIMEOUT
    pub punishment: String,
    pub duration_seconds: Option<i64>,
    pub updated_at: DateTime<Utc>,
}
