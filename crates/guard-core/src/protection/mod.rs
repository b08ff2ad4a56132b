//! Protection data model - limits, punishments, whitelist, cases, member views

mod case;
mod limits;
mod member;
mod whitelist;

pub use case::{CaseMetadata, ModerationCase, NewCase};
pub use limits::{Punishment, PunishmentKind, PunishmentKindParseError, RateLimit};
pub use member::{GuildView, MemberView};
pub use whitelist::{TargetKind, WhitelistEntry, WhitelistScope};
