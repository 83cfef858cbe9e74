//! Periodic auto-refresh task
//!
//! An explicit schedulable task with a start/stop lifecycle, owned by
//! whoever owns the engine. Each tick invokes the engine's refresh
//! transition; ticks while refresh is disabled are no-ops inside the engine,
//! not errors. Stopping (or dropping) the timer cancels the task so it never
//! leaks across provider remounts.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::application::sync_engine::SyncEngine;

pub struct RefreshTimer {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    /// Spawn the periodic refresh task. The first refresh fires one full
    /// period after start, not immediately.
    pub fn start(engine: Arc<SyncEngine>, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // interval yields its first tick immediately; consume it so the
            // cadence starts one period out
            ticker.tick().await;

            info!("⏲️ Auto-refresh timer started ({period:?})");
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        info!("Auto-refresh timer stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = engine.refresh().await {
                            warn!("Periodic refresh failed: {e}");
                        }
                    }
                }
            }
        });

        Self { cancel, handle }
    }

    /// Stop the timer. Idempotent.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
