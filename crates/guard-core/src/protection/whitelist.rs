//! Whitelist entries - per-guild enforcement exemptions

use serde::{Deserialize, Serialize};

use crate::events::ActionKind;
use crate::value_objects::Snowflake;

/// Whether a whitelist entry targets a user id or a role id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetKind {
    User,
    Role,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Role => "ROLE",
        }
    }
}

/// What an entry exempts its target from: one action kind, or everything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WhitelistScope {
    Action(ActionKind),
    All,
}

impl WhitelistScope {
    /// Database / wire representation ("ALL" or the action kind string)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Action(kind) => kind.as_str(),
            Self::All => "ALL",
        }
    }

    /// Parse from the wire form
    pub fn parse(s: &str) -> Option<Self> {
        if s == "ALL" {
            return Some(Self::All);
        }
        s.parse::<ActionKind>().ok().map(Self::Action)
    }

    /// True when this scope covers the given action kind
    #[inline]
    pub fn covers(self, kind: ActionKind) -> bool {
        match self {
            Self::All => true,
            Self::Action(k) => k == kind,
        }
    }
}

/// One exemption: a user or role bypasses enforcement for the scoped actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistEntry {
    pub target: Snowflake,
    pub target_kind: TargetKind,
    pub scope: WhitelistScope,
}

impl WhitelistEntry {
    pub fn user(target: Snowflake, scope: WhitelistScope) -> Self {
        Self {
            target,
            target_kind: TargetKind::User,
            scope,
        }
    }

    pub fn role(target: Snowflake, scope: WhitelistScope) -> Self {
        Self {
            target,
            target_kind: TargetKind::Role,
            scope,
        }
    }

    /// True when this entry exempts the given actor (by id or held role)
    /// from enforcement of `kind`.
    pub fn matches(&self, actor_id: Snowflake, actor_role_ids: &[Snowflake], kind: ActionKind) -> bool {
        if !self.scope.covers(kind) {
            return false;
        }
        match self.target_kind {
            TargetKind::User => self.target == actor_id,
            TargetKind::Role => actor_role_ids.contains(&self.target),
        }
    }
}
