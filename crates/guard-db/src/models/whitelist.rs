//! Whitelist entry database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for whitelist_entries table
#[derive(Debug, Clone, FromRow)]
pub struct WhitelistEntryModel {
    pub guild_id: i64,
    pub target_id: i64,
    /// Target kind: USER or ROLE
    pub target_kind: String,
    /// Exemption scope: ALL or a single action kind string
    pub scope: String,
    pub created_at: DateTime<Utc>,
}
