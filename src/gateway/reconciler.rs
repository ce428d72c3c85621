//! Background task that retries unrecorded game results.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::Orchestrator;

const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Runs [`Orchestrator::reconcile`] every `every` until the handle is aborted.
pub fn spawn_reconciler(orchestrator: Orchestrator, every: Duration) -> JoinHandle<()> {
    let every = every.max(MIN_INTERVAL);
    info!(interval_ms = every.as_millis() as u64, "Starting result reconciler");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match orchestrator.reconcile().await {
                Ok(report) if report.is_idle() => debug!("Nothing to reconcile"),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Could not fetch pending results"),
            }
        }
    })
}
