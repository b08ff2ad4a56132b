//! Categories of privileged actions monitored by the protection engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monitored privileged-action category.
///
/// Each kind can carry its own rate limit and punishment configuration;
/// the wire form is the SCREAMING_SNAKE string stored in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    BanMembers,
    KickMembers,
    DeleteRoles,
    CreateRoles,
    DeleteChannels,
    CreateChannels,
    AddBots,
    DangerousPerms,
    GiveAdminRole,
    PruneMembers,
}

impl ActionKind {
    /// All monitored kinds, in display order
    pub const ALL: [ActionKind; 10] = [
        ActionKind::BanMembers,
        ActionKind::KickMembers,
        ActionKind::DeleteRoles,
        ActionKind::CreateRoles,
        ActionKind::DeleteChannels,
        ActionKind::CreateChannels,
        ActionKind::AddBots,
        ActionKind::DangerousPerms,
        ActionKind::GiveAdminRole,
        ActionKind::PruneMembers,
    ];

    /// Database / wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BanMembers => "BAN_MEMBERS",
            Self::KickMembers => "KICK_MEMBERS",
            Self::DeleteRoles => "DELETE_ROLES",
            Self::CreateRoles => "CREATE_ROLES",
            Self::DeleteChannels => "DELETE_CHANNELS",
            Self::CreateChannels => "CREATE_CHANNELS",
            Self::AddBots => "ADD_BOTS",
            Self::DangerousPerms => "DANGEROUS_PERMS",
            Self::GiveAdminRole => "GIVE_ADMIN_ROLE",
            Self::PruneMembers => "PRUNE_MEMBERS",
        }
    }

    /// Human-readable name for notifications and status displays
    pub fn display_name(self) -> &'static str {
        match self {
            Self::BanMembers => "Banning Members",
            Self::KickMembers => "Kicking Members",
            Self::DeleteRoles => "Deleting Roles",
            Self::CreateRoles => "Creating Roles",
            Self::DeleteChannels => "Deleting Channels",
            Self::CreateChannels => "Creating Channels",
            Self::AddBots => "Adding Bots",
            Self::DangerousPerms => "Dangerous Permissions",
            Self::GiveAdminRole => "Giving Admin Roles",
            Self::PruneMembers => "Pruning Members",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an ActionKind from its wire form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action kind: {0}")]
pub struct ActionKindParseError(pub String);

impl std::str::FromStr for ActionKind {
    type Err = ActionKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BAN_MEMBERS" => Ok(Self::BanMembers),
            "KICK_MEMBERS" => Ok(Self::KickMembers),
            "DELETE_ROLES" => Ok(Self::DeleteRoles),
            "CREATE_ROLES" => Ok(Self::CreateRoles),
            "DELETE_CHANNELS" => Ok(Self::DeleteChannels),
            "CREATE_CHANNELS" => Ok(Self::CreateChannels),
            "ADD_BOTS" => Ok(Self::AddBots),
            "DANGEROUS_PERMS" => Ok(Self::DangerousPerms),
            "GIVE_ADMIN_ROLE" => Ok(Self::GiveAdminRole),
            "PRUNE_MEMBERS" => Ok(Self::PruneMembers),
            other => Err(ActionKindParseError(other.to_string())),
        }
    }
}
