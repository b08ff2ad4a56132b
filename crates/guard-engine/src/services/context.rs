//! Engine context - dependency container for services
//!
//! Holds the stores, the platform gateway and the shared lock table used by
//! every service. All dependencies are trait objects so tests can substitute
//! in-memory fakes.

use std::sync::Arc;

use guard_core::traits::{
    CaseStore, EventStore, LimitStore, NotificationSink, PlatformGateway, WhitelistStore,
};

use crate::lock::EnforcementLocks;

/// Engine context containing all dependencies
#[derive(Clone)]
pub struct EngineContext {
    // Stores
    events: Arc<dyn EventStore>,
    limits: Arc<dyn LimitStore>,
    whitelist: Arc<dyn WhitelistStore>,
    cases: Arc<dyn CaseStore>,

    // Platform
    gateway: Arc<dyn PlatformGateway>,
    notifier: Arc<dyn NotificationSink>,

    // Shared state
    locks: Arc<EnforcementLocks>,
}

impl EngineContext {
    /// Create a new engine context with all dependencies
    pub fn new(
        events: Arc<dyn EventStore>,
        limits: Arc<dyn LimitStore>,
        whitelist: Arc<dyn WhitelistStore>,
        cases: Arc<dyn CaseStore>,
        gateway: Arc<dyn PlatformGateway>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            events,
            limits,
            whitelist,
            cases,
            gateway,
            notifier,
            locks: Arc::new(EnforcementLocks::new()),
        }
    }

    /// Wire the context with the PostgreSQL repositories over one pool.
    /// The gateway and notifier stay injectable; they live outside the
    /// database.
    pub fn with_postgres(
        pool: guard_db::PgPool,
        gateway: Arc<dyn PlatformGateway>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self::new(
            Arc::new(guard_db::PgEventRepository::new(pool.clone())),
            Arc::new(guard_db::PgLimitRepository::new(pool.clone())),
            Arc::new(guard_db::PgWhitelistRepository::new(pool.clone())),
            Arc::new(guard_db::PgCaseRepository::new(pool)),
            gateway,
            notifier,
        )
    }

    /// Get the event store
    pub fn events(&self) -> &dyn EventStore {
        self.events.as_ref()
    }

    /// Get the limit store
    pub fn limits(&self) -> &dyn LimitStore {
        self.limits.as_ref()
    }

    /// Get the whitelist store
    pub fn whitelist(&self) -> &dyn WhitelistStore {
        self.whitelist.as_ref()
    }

    /// Get the case store
    pub fn cases(&self) -> &dyn CaseStore {
        self.cases.as_ref()
    }

    /// Get the platform gateway
    pub fn gateway(&self) -> &dyn PlatformGateway {
        self.gateway.as_ref()
    }

    /// Get the notification sink
    pub fn notifier(&self) -> &dyn NotificationSink {
        self.notifier.as_ref()
    }

    /// Get the enforcement lock table
    pub fn locks(&self) -> &EnforcementLocks {
        self.locks.as_ref()
    }
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("stores", &"...")
            .field("gateway", &"...")
            .field("locks", &self.locks)
            .finish()
    }
}

/// Builder for creating EngineContext with custom configuration
#[derive(Default)]
pub struct EngineContextBuilder {
    events: Option<Arc<dyn EventStore>>,
    limits: Option<Arc<dyn LimitStore>>,
    whitelist: Option<Arc<dyn WhitelistStore>>,
    cases: Option<Arc<dyn CaseStore>>,
    gateway: Option<Arc<dyn PlatformGateway>>,
    notifier: Option<Arc<dyn NotificationSink>>,
}

impl EngineContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(mut self, store: Arc<dyn EventStore>) -> Self {
        self.events = Some(store);
        self
    }

    pub fn limits(mut self, store: Arc<dyn LimitStore>) -> Self {
        self.limits = Some(store);
        self
    }

    pub fn whitelist(mut self, store: Arc<dyn WhitelistStore>) -> Self {
        self.whitelist = Some(store);
        self
    }

    pub fn cases(mut self, store: Arc<dyn CaseStore>) -> Self {
        self.cases = Some(store);
        self
    }

    pub fn gateway(mut self, gateway: Arc<dyn PlatformGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the EngineContext
    ///
    /// # Errors
    /// Returns `EngineError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::EngineResult<EngineContext> {
        use super::error::EngineError;

        Ok(EngineContext::new(
            self.events.ok_or_else(|| EngineError::validation("events store is required"))?,
            self.limits.ok_or_else(|| EngineError::validation("limits store is required"))?,
            self.whitelist.ok_or_else(|| EngineError::validation("whitelist store is required"))?,
            self.cases.ok_or_else(|| EngineError::validation("cases store is required"))?,
            self.gateway.ok_or_else(|| EngineError::validation("gateway is required"))?,
            self.notifier.ok_or_else(|| EngineError::validation("notifier is required"))?,
        ))
    }
}
