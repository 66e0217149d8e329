//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{lock_store, CacheStore};

/// Shortest sweep period accepted; `tokio::time::interval` rejects zero.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Spawns a background task that sweeps expired entries once per `interval`.
///
/// The first sweep fires one full interval after the task starts. Returns
/// only after the spawned task has confirmed it is running, so callers never
/// observe a store whose sweeper has not been scheduled yet.
///
/// The task exits when `cancel` is triggered.
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(CacheStore::new(ttl)));
/// let cancel = CancellationToken::new();
/// let handle = spawn_sweep_task(store.clone(), ttl, cancel.clone()).await;
/// // Later, during shutdown:
/// cancel.cancel();
/// handle.await?;
/// ```
pub async fn spawn_sweep_task(
    store: Arc<Mutex<CacheStore>>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let interval = interval.max(MIN_SWEEP_INTERVAL);
    let (ready_tx, ready_rx) = oneshot::channel();

    let handle = tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Starting TTL sweep task with interval of {:?}", interval);
        let _ = ready_tx.send(());

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("TTL sweep task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = lock_store(&store).sweep_expired();

                    if removed > 0 {
                        info!("TTL sweep: removed {} expired entries", removed);
                    } else {
                        debug!("TTL sweep: no expired entries found");
                    }
                }
            }
        }
    });

    if ready_rx.await.is_err() {
        warn!("TTL sweep task exited before signalling readiness");
    }

    handle
}
