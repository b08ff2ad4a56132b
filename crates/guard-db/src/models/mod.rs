//! Database models mapping directly to table rows

mod case;
mod punishment;
mod rate_limit;
mod security_event;
mod whitelist;

pub use case::ModerationCaseModel;
pub use punishment::PunishmentModel;
pub use rate_limit::RateLimitModel;
pub use security_event::SecurityEventModel;
pub use whitelist::WhitelistEntryModel;
