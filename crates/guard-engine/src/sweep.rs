//! Retention sweeper - periodic purge of aged security events
//!
//! Runs on its own tokio task so the ingest path never pays for deletion.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use guard_common::config::RetentionConfig;

use crate::services::{ActionLimiter, EngineContext, EngineResult};

/// Retention sweeper
pub struct RetentionSweeper {
    ctx: EngineContext,
    config: RetentionConfig,
}

impl RetentionSweeper {
    /// Create a new RetentionSweeper
    pub fn new(ctx: EngineContext, config: RetentionConfig) -> Self {
        Self { ctx, config }
    }

    /// Delete events past the retention cutoff; returns the number deleted
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> EngineResult<u64> {
        ActionLimiter::new(&self.ctx)
            .cleanup_old_actions(self.config.retention_days)
            .await
    }

    /// Spawn the periodic sweep loop. The first tick fires after one full
    /// interval, not at startup.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let period = Duration::from_secs(self.config.sweep_interval_seconds);
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            interval.tick().await;

            loop {
                interval.tick().await;
                match self.run_once().await {
                    Ok(deleted) => {
                        info!(deleted, retention_days = self.config.retention_days, "retention sweep finished");
                    }
                    Err(e) => {
                        error!(error = %e, "retention sweep failed");
                    }
                }
            }
        })
    }
}
