//! Cache Store Module
//!
//! The entry table: a HashMap of byte payloads keyed by request identity,
//! with age-based expiry. Synchronization lives one level up in
//! [`SharedCache`](crate::cache::SharedCache).

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Entry table with a single cache-wide TTL.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Age at which an entry becomes eligible for removal
    ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Add ==
    /// Inserts or replaces the entry for `key`, stamped with the current instant.
    pub fn add(&mut self, key: impl Into<String>, payload: Vec<u8>) {
        self.add_at(key, payload, Instant::now());
    }

    /// Inserts or replaces the entry for `key` with an explicit creation instant.
    pub fn add_at(&mut self, key: impl Into<String>, payload: Vec<u8>, now: Instant) {
        self.entries
            .insert(key.into(), CacheEntry::created_at(payload, now));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns a copy of the payload for `key`.
    ///
    /// Age is not consulted: an entry stays visible until a sweep removes it.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.payload.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Sweep Expired ==
    /// Removes every entry with `now >= created_at + ttl`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired_at(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now, ttl));
        let removed = before - self.entries.len();

        self.stats.record_sweep(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    /// Removes expired entries as of the current instant.
    pub fn sweep_expired(&mut self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
