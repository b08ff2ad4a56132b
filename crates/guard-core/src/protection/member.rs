//! Live platform views - member and guild snapshots fetched at decision time

use chrono::{DateTime, Utc};

use crate::value_objects::{Permissions, Snowflake};

/// Snapshot of a guild member as the platform reports it right now.
///
/// Fetched live before any enforcement decision; a member who has already
/// left is `None` at the gateway, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberView {
    pub user_id: Snowflake,
    pub tag: String,
    pub is_bot: bool,
    pub joined_at: DateTime<Utc>,
    pub role_ids: Vec<Snowflake>,
    /// Position of the member's highest role (0 = @everyone only)
    pub highest_role_position: i32,
    /// Effective guild-level permissions
    pub permissions: Permissions,
}

impl MemberView {
    /// True when this member's permission set bypasses enforcement
    #[inline]
    pub fn is_administrator(&self) -> bool {
        self.permissions.contains(Permissions::ADMINISTRATOR)
    }

    /// True when this member outranks or ties `other` in the role hierarchy
    #[inline]
    pub fn outranks_or_ties(&self, other: &MemberView) -> bool {
        self.highest_role_position >= other.highest_role_position
    }
}

/// Snapshot of a guild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuildView {
    pub id: Snowflake,
    pub owner_id: Snowflake,
}

impl GuildView {
    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id
    }
}
