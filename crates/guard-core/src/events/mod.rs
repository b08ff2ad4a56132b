//! Security events - the normalized privileged-action stream the engine consumes

mod action_kind;
mod security_event;

pub use action_kind::{ActionKind, ActionKindParseError};
pub use security_event::SecurityEvent;
