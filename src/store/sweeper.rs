//! Periodic housekeeping for attempt records.
//!
//! Lock expiry never depends on this task; it only bounds memory and keeps
//! snapshots fresh.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::guard::LockoutGuard;

pub struct EvictionSweeper {
    guard: LockoutGuard,
    interval: Duration,
}

impl EvictionSweeper {
    pub fn new(guard: LockoutGuard, interval: Duration) -> Self {
        Self { guard, interval }
    }

    /// One housekeeping pass: evict, refresh the gauge, flush.
    pub fn sweep(&self) {
        match self.guard.evict_expired() {
            Ok(evicted) if evicted > 0 => {
                tracing::info!(evicted, "Sweeper evicted idle attempt records");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Sweeper eviction failed"),
        }

        if let Err(e) = self.guard.summary() {
            tracing::warn!(error = %e, "Sweeper could not read store summary");
        }

        if let Err(e) = self.guard.flush() {
            tracing::warn!(error = %e, "Sweeper snapshot flush failed");
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Eviction sweeper starting");

        let mut ticker = time::interval(self.interval);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => self.sweep(),
                _ = shutdown.recv() => {
                    tracing::info!("Eviction sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
