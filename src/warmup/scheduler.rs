//! Periodic warmup.
//!
//! Fires one cycle immediately, then one per period, forever. Each tick runs
//! its cycle on a separate task, so a slow cycle never delays the clock; an
//! overlapping tick is absorbed by the orchestrator's single-flight guard.

use super::orchestrator::WarmupOrchestrator;

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct WarmupScheduler {
    orchestrator: Arc<WarmupOrchestrator>,
    period: Duration,
}

impl WarmupScheduler {
    pub fn new(orchestrator: Arc<WarmupOrchestrator>, period: Duration) -> Arc<Self> {
        Arc::new(Self {
            orchestrator,
            period,
        })
    }

    /// Spawns the schedule loop and returns immediately. Abort the handle to stop it.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tracing::info!("Periodic warmup every {:?}", self.period);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.period);
            loop {
                // The first tick completes immediately.
                interval.tick().await;

                let orchestrator = self.orchestrator.clone();
                tokio::spawn(async move {
                    let summary = orchestrator.perform_full_warmup().await;
                    tracing::debug!("Scheduled warmup: {:?}", summary);
                });
            }
        })
    }
}
