//! Periodic housekeeping: publish views, evict idle sessions.
//!
//! The worker only reads combat state. Eviction persists a session before
//! dropping it, so the next call for that id restores it transparently.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::api::{Result, RuntimeError};
use crate::manager::SessionManager;

pub struct SessionWorker {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

impl SessionWorker {
    /// Spawns the worker on the current tokio runtime, ticking every
    /// `broadcast_interval`.
    pub fn spawn(manager: Arc<SessionManager>) -> Self {
        let period = manager.config().broadcast_interval;
        let (shutdown, mut stop) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let evicted = manager.evict_expired().await;
                        if !evicted.is_empty() {
                            info!(target: "runtime", count = evicted.len(), "evicted idle sessions");
                        }
                        let published = manager.broadcast_views().await;
                        debug!(target: "runtime", published, "views broadcast");
                    }
                    changed = stop.changed() => {
                        if changed.is_err() || *stop.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!(target: "runtime", "session worker stopped");
        });

        Self { handle, shutdown }
    }

    /// Stops the worker and waits for it to exit.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown.send(true);
        self.handle.await.map_err(RuntimeError::WorkerJoin)
    }
}
