//! TTL Reaper Task
//!
//! Background task that removes expired cache entries once per TTL.

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::Cache;

// == Reaper Handle ==
/// Owns a running reaper task.
///
/// Call [`ReaperHandle::shutdown`] to stop it and wait for it to exit.
/// Dropping the handle aborts the task.
#[derive(Debug)]
pub struct ReaperHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Signals the task to stop and waits until it has exited.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            // Err means the task already exited on its own
            let _ = stop.send(());
        }
        let _ = (&mut self.task).await;
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ReaperHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns the reclamation loop for `cache`.
///
/// The loop ticks every `cache.ttl()`, with the first tick one TTL after
/// spawning, and removes entries older than the TTL on each tick. It holds
/// only a weak reference, so it also exits once every clone of the cache
/// has been dropped.
///
/// Must be called from within a tokio runtime.
///
/// # Example
/// ```ignore
/// let cache = Cache::from_unit("second", 5)?;
/// let reaper = spawn_reaper(&cache);
/// // Later, during shutdown:
/// reaper.shutdown().await;
/// ```
pub fn spawn_reaper(cache: &Cache) -> ReaperHandle {
    let period = cache.ttl();
    let weak = cache.downgrade();
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        info!("Starting reaper with a period of {:?}", period);

        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut stop_rx => {
                    info!("Reaper received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    let Some(cache) = weak.upgrade() else {
                        debug!("Cache dropped, reaper exiting");
                        break;
                    };

                    let removed = cache.reclaim_expired().await;
                    if removed > 0 {
                        info!("TTL reaper: removed {} expired entries", removed);
                    } else {
                        debug!("TTL reaper: no expired entries found");
                    }
                }
            }
        }
    });

    ReaperHandle {
        stop: Some(stop_tx),
        task,
    }
}
