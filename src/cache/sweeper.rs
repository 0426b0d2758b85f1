//! Background cache sweep
//!
//! Removes expired entries on a fixed interval so dead keys do not accumulate
//! between reads. The sweep only deletes entries that are already expired, so
//! it never races destructively with readers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::manager::CacheStore;

/// Handle for controlling the background sweep task
pub struct SweepHandle {
    /// Signals the task to stop
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Spawns a task that sweeps `cache` every `interval`
    ///
    /// The first sweep happens one full interval after spawning.
    /// Must be called from within a tokio runtime.
    pub fn spawn<V>(cache: Arc<dyn CacheStore<V>>, interval: Duration) -> Self
    where
        V: Send + Sync + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // Skip the first tick (immediate)
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = cache.sweep();
                        if removed > 0 {
                            info!(removed, "swept expired cache entries");
                        } else {
                            debug!("cache sweep found nothing to remove");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self { shutdown_tx, task }
    }

    /// Stops the sweep task and waits for it to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.task.await;
    }
}
