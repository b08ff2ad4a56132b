//! Permissions bitflags for Discord-like access control
//!
//! Covers the moderation surface the engine cares about: the permissions a
//! punishment requires, and the subset considered dangerous when held by a
//! role (used by the dangerous-role strip).

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Discord-like permission flags
    ///
    /// Stored as BIGINT in database, serialized as string in JSON for JavaScript safety.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u64 {
        /// Create, edit, delete channels
        const MANAGE_CHANNELS  = 1 << 0;
        /// Create, edit, delete, assign roles
        const MANAGE_ROLES     = 1 << 1;
        /// Edit guild settings
        const MANAGE_GUILD     = 1 << 2;
        /// Kick members from guild
        const KICK_MEMBERS     = 1 << 3;
        /// Ban members from guild
        const BAN_MEMBERS      = 1 << 4;
        /// Timeout members (communication disabled)
        const MODERATE_MEMBERS = 1 << 5;
        /// Bypass all permission checks
        const ADMINISTRATOR    = 1 << 6;
        /// View the guild audit log
        const VIEW_AUDIT_LOG   = 1 << 7;

        /// Permissions that make a role an escalation target; a role granting
        /// any of these is stripped by the dangerous-role sweep.
        const DANGEROUS = Self::ADMINISTRATOR.bits()
            | Self::MANAGE_GUILD.bits()
            | Self::MANAGE_ROLES.bits();

        /// All permissions (for guild owners)
        const ALL = u64::MAX;
    }
}

impl Permissions {
    /// Check if the permission set contains a required permission
    ///
    /// Administrators bypass all permission checks.
    #[inline]
    pub fn has(&self, permission: Permissions) -> bool {
        if self.contains(Permissions::ADMINISTRATOR) {
            return true;
        }
        self.contains(permission)
    }

    /// Check if the permission set has any of the given permissions
    #[inline]
    pub fn has_any(&self, permissions: Permissions) -> bool {
        if self.contains(Permissions::ADMINISTRATOR) {
            return true;
        }
        self.intersects(permissions)
    }

    /// True when this set grants administrative-equivalent capability.
    ///
    /// Deliberately does NOT go through `has`: a plain member with no
    /// dangerous bits must not count as dangerous.
    #[inline]
    pub fn is_dangerous(&self) -> bool {
        self.intersects(Permissions::DANGEROUS)
    }

    /// Combine permissions from multiple roles
    pub fn combine<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Permissions>,
    {
        roles.into_iter().fold(Permissions::empty(), |acc, p| acc | p)
    }

    /// Get the raw bits as i64 (for database storage)
    #[inline]
    pub fn to_i64(self) -> i64 {
        self.bits() as i64
    }

    /// Create from raw i64 bits (from database)
    #[inline]
    pub fn from_i64(bits: i64) -> Self {
        Permissions::from_bits_truncate(bits as u64)
    }

    /// Get a list of all individual permissions that are set
    pub fn list(&self) -> Vec<&'static str> {
        let mut result = Vec::new();
        if self.contains(Self::MANAGE_CHANNELS) {
            result.push("MANAGE_CHANNELS");
        }
        if self.contains(Self::MANAGE_ROLES) {
            result.push("MANAGE_ROLES");
        }
        if self.contains(Self::MANAGE_GUILD) {
            result.push("MANAGE_GUILD");
        }
        if self.contains(Self::KICK_MEMBERS) {
            result.push("KICK_MEMBERS");
        }
        if self.contains(Self::BAN_MEMBERS) {
            result.push("BAN_MEMBERS");
        }
        if self.contains(Self::MODERATE_MEMBERS) {
            result.push("MODERATE_MEMBERS");
        }
        if self.contains(Self::ADMINISTRATOR) {
            result.push("ADMINISTRATOR");
        }
        if self.contains(Self::VIEW_AUDIT_LOG) {
            result.push("VIEW_AUDIT_LOG");
        }
        result
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

// Serialize as string for JSON (JavaScript BigInt safety)
impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.bits().to_string())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<u64>()
            .map(Permissions::from_bits_truncate)
            .map_err(serde::de::Error::custom)
    }
}
