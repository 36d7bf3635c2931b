use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::registry::AgentRegistry;

/// Handle to the background sweep task. Dropping it without calling
/// `stop` leaves the task running for the life of the runtime.
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Spawns the periodic liveness sweep: every `sweep_interval` from the
/// registry's config, purge workers whose heartbeat exceeded the timeout.
/// The sweep takes the same registry lock as every other mutation, so it
/// never races an in-flight register or placement for the worker being
/// purged.
pub fn spawn_sweeper(registry: Arc<AgentRegistry>) -> SweeperHandle {
    let (shutdown, mut shutdown_rx) = watch::channel(false);
    let period = registry.config().sweep_interval;

    let task = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = registry.sweep();
                    if !purged.is_empty() {
                        debug!(purged = purged.len(), "sweep purged stale workers");
                    }
                }
                result = shutdown_rx.changed() => {
                    if result.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });

    SweeperHandle { shutdown, task }
}
