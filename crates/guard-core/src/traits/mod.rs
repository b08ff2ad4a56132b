//! Ports - the store and gateway interfaces the engine is built against

mod gateway;
mod stores;

pub use gateway::{NotificationSink, PlatformGateway, SecurityNotice};
pub use stores::{CaseStore, EventStore, LimitStore, RepoResult, WhitelistStore};
