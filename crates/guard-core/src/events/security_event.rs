//! SecurityEvent - one observed privileged action

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::events::ActionKind;
use crate::value_objects::Snowflake;

/// One privileged action observed in a guild, normalized from the platform
/// audit trail by the event source.
///
/// Immutable once recorded. The `source_event_id` is the platform audit-log
/// entry id and doubles as the de-duplication key: the event source must not
/// deliver the same underlying entry twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub guild_id: Snowflake,
    /// The member who performed the action
    pub actor_id: Snowflake,
    pub kind: ActionKind,
    /// Channel, role, or user affected, when the platform reports one
    pub target_id: Option<Snowflake>,
    /// Audit-log entry id this event was derived from
    pub source_event_id: Option<Snowflake>,
    pub occurred_at: DateTime<Utc>,
    /// Opaque extra context from the audit entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonValue>,
}

impl SecurityEvent {
    /// Create an event with the minimum required fields
    pub fn new(
        guild_id: Snowflake,
        actor_id: Snowflake,
        kind: ActionKind,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            guild_id,
            actor_id,
            kind,
            target_id: None,
            source_event_id: None,
            occurred_at,
            metadata: None,
        }
    }

    /// Attach the affected target
    pub fn with_target(mut self, target_id: Snowflake) -> Self {
        self.target_id = Some(target_id);
        self
    }

    /// Attach the originating audit-log entry id
    pub fn with_source(mut self, source_event_id: Snowflake) -> Self {
        self.source_event_id = Some(source_event_id);
        self
    }

    /// Attach opaque metadata
    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// True when the identifying fields a recordable event needs are present
    pub fn is_valid(&self) -> bool {
        !self.guild_id.is_zero() && !self.actor_id.is_zero()
    }
}
