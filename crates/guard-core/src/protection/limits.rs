//! Rate limit and punishment configuration, per (guild, action kind)

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Permissions;

/// A configured action-rate limit: more than `limit_count` actions inside a
/// sliding `window` triggers enforcement. Absence of a limit means the action
/// kind is unmonitored for that guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub limit_count: i32,
    pub window: Duration,
}

impl RateLimit {
    /// Create a limit; counts and windows are validated by the settings
    /// service before they reach a store.
    pub fn new(limit_count: i32, window: Duration) -> Self {
        Self {
            limit_count,
            window,
        }
    }

    /// Convenience constructor for a window given in seconds
    pub fn per_seconds(limit_count: i32, window_seconds: i64) -> Self {
        Self::new(limit_count, Duration::seconds(window_seconds))
    }
}

/// The punishment applied to an actor who trips a rate limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PunishmentKind {
    Ban,
    Kick,
    Timeout,
}

impl PunishmentKind {
    /// Conservative fallback used when no punishment has been configured for
    /// an action kind that has already tripped its limit.
    pub const DEFAULT: PunishmentKind = PunishmentKind::Ban;

    /// Database / wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ban => "BAN",
            Self::Kick => "KICK",
            Self::Timeout => "TIMEOUT",
        }
    }

    /// The platform permission the enforcing identity needs to apply this
    /// punishment kind.
    pub fn required_permission(self) -> Permissions {
        match self {
            Self::Ban => Permissions::BAN_MEMBERS,
            Self::Kick => Permissions::KICK_MEMBERS,
            Self::Timeout => Permissions::MODERATE_MEMBERS,
        }
    }
}

impl fmt::Display for PunishmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing a PunishmentKind from its wire form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown punishment kind: {0}")]
pub struct PunishmentKindParseError(pub String);

impl std::str::FromStr for PunishmentKind {
    type Err = PunishmentKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BAN" => Ok(Self::Ban),
            "KICK" => Ok(Self::Kick),
            "TIMEOUT" => Ok(Self::Timeout),
            other => Err(PunishmentKindParseError(other.to_string())),
        }
    }
}

/// Punishment assignment for one (guild, action kind)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punishment {
    pub kind: PunishmentKind,
    /// Timeout length; meaningful only when `kind` is `Timeout`
    pub duration_seconds: Option<u32>,
}

impl Punishment {
    /// Timeout length applied when a Timeout punishment has no duration set
    pub const DEFAULT_TIMEOUT_SECONDS: u32 = 600;

    pub fn new(kind: PunishmentKind, duration_seconds: Option<u32>) -> Self {
        Self {
            kind,
            duration_seconds,
        }
    }

    /// The fallback punishment used when none is configured
    pub fn fallback() -> Self {
        Self::new(PunishmentKind::DEFAULT, None)
    }

    /// Effective timeout length in seconds, defaulting when unset
    pub fn timeout_seconds(&self) -> u32 {
        self.duration_seconds
            .unwrap_or(Self::DEFAULT_TIMEOUT_SECONDS)
    }
}
