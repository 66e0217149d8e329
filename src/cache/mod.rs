//! Cache Module
//!
//! Provides an in-memory byte cache with a single TTL and a background sweep.

mod entry;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::CacheStore;

pub(crate) use shared::lock_store;
