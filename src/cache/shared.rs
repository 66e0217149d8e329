//! Shared Cache Handle
//!
//! Thread-safe handle over a [`CacheStore`] that owns the background sweep
//! task for the store's lifetime.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::tasks::spawn_sweep_task;

/// Locks the store, recovering the guard if a previous holder panicked.
///
/// Every critical section is a single map operation, so a poisoned table is
/// still consistent.
pub(crate) fn lock_store(store: &Mutex<CacheStore>) -> MutexGuard<'_, CacheStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

// == Shared Cache ==
/// Cloneable handle to a TTL cache with a running sweeper.
///
/// All clones share one entry table and one sweep task. The task stops when
/// [`SharedCache::shutdown`] is called or when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct SharedCache {
    store: Arc<Mutex<CacheStore>>,
    sweeper: Arc<Sweeper>,
}

#[derive(Debug)]
struct Sweeper {
    cancel: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl SharedCache {
    // == Constructor ==
    /// Creates an empty cache and starts its sweep task.
    ///
    /// Resolves once the sweep task is running. Must be called from within a
    /// Tokio runtime.
    pub async fn start(ttl: Duration) -> Self {
        let store = Arc::new(Mutex::new(CacheStore::new(ttl)));
        let cancel = CancellationToken::new();
        let handle = spawn_sweep_task(store.clone(), ttl, cancel.clone()).await;

        Self {
            store,
            sweeper: Arc::new(Sweeper {
                cancel,
                handle: Mutex::new(Some(handle)),
            }),
        }
    }

    // == Add ==
    /// Inserts or replaces the payload for `key`, resetting its age.
    pub fn add(&self, key: impl Into<String>, payload: Vec<u8>) {
        let key = key.into();
        debug!(key = %key, bytes = payload.len(), "cache add");
        lock_store(&self.store).add(key, payload);
    }

    // == Get ==
    /// Returns a copy of the payload for `key` if it has not been swept yet.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        lock_store(&self.store).get(key)
    }

    pub fn ttl(&self) -> Duration {
        lock_store(&self.store).ttl()
    }

    pub fn stats(&self) -> CacheStats {
        lock_store(&self.store).stats()
    }

    pub fn len(&self) -> usize {
        lock_store(&self.store).len()
    }

    pub fn is_empty(&self) -> bool {
        lock_store(&self.store).is_empty()
    }

    // == Sweeper Lifecycle ==
    /// Returns true while the background sweep task is alive.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the sweep task and waits for it to exit.
    ///
    /// Entries already stored stay readable; they simply no longer expire.
    /// Calling this more than once is a no-op.
    pub async fn shutdown(&self) {
        self.sweeper.cancel.cancel();

        let handle = self
            .sweeper
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("TTL sweep task ended abnormally: {}", e);
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_add_then_get() {
        let cache = SharedCache::start(Duration::from_millis(5000)).await;

        cache.add("a", b"x".to_vec());
        cache.add("b", b"y".to_vec());

        assert_eq!(cache.get("a"), Some(b"x".to_vec()));
        assert_eq!(cache.get("b"), Some(b"y".to_vec()));
        assert_eq!(cache.len(), 2);

        cache.shutdown().await;
    }

    #[tokio::test]
    async fn test_entry_gone_after_ttl_and_sweep() {
        let cache = SharedCache::start(Duration::from_millis(5)).await;

        cache.add("a", b"x".to_vec());
        sleep(Duration::from_millis(10)).await;

        // Real-clock scheduling may delay the first tick; allow one more interval
        if cache.get("a").is_some() {
            sleep(Duration::from_millis(20)).await;
        }
        assert!(cache.get("a").is_none());

        cache.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_present_before_expiry() {
        let cache = SharedCache::start(Duration::from_secs(1)).await;

        cache.add("a", b"x".to_vec());
        sleep(Duration::from_millis(900)).await;

        assert_eq!(cache.get("a"), Some(b"x".to_vec()));
        cache.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_readd_resets_age() {
        let cache = SharedCache::start(Duration::from_secs(1)).await;

        cache.add("a", b"x".to_vec());
        sleep(Duration::from_millis(800)).await;
        cache.add("a", b"x2".to_vec());

        // Past the original expiry, the sweep at 1s sees an entry aged 200ms
        sleep(Duration::from_millis(400)).await;
        assert_eq!(cache.get("a"), Some(b"x2".to_vec()));

        // The sweep at 2s sees it aged 1.2s
        sleep(Duration::from_millis(1000)).await;
        assert!(cache.get("a").is_none());

        cache.shutdown().await;
    }

    #[tokio::test]
    async fn test_sweeper_running_after_start() {
        let cache = SharedCache::start(Duration::from_secs(60)).await;
        assert!(cache.is_sweeping());

        cache.shutdown().await;
        assert!(!cache.is_sweeping());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_expiry() {
        let cache = SharedCache::start(Duration::from_millis(10)).await;
        cache.shutdown().await;
        cache.shutdown().await;

        cache.add("a", b"x".to_vec());
        sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.get("a"), Some(b"x".to_vec()));
        assert_eq!(cache.stats().sweeps, 0);
    }

    #[tokio::test]
    async fn test_drop_of_last_handle_cancels_sweeper() {
        let cache = SharedCache::start(Duration::from_secs(60)).await;
        let token = cache.sweeper.cancel.clone();
        let clone = cache.clone();

        drop(cache);
        assert!(!token.is_cancelled(), "A live clone keeps the sweeper running");

        drop(clone);
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = SharedCache::start(Duration::from_secs(60)).await;
        let other = cache.clone();

        other.add("shared", b"v".to_vec());

        assert_eq!(cache.get("shared"), Some(b"v".to_vec()));
        cache.shutdown().await;
    }
}
