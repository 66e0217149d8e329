//! Read-Through Fetcher
//!
//! Serves decoded values from the cache, falling back to the fetch
//! capability on a miss and storing the raw bytes before decoding.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cache::SharedCache;
use crate::error::{Error, Result, TransportError};
use crate::fetch::Fetcher;

/// Cache-first fetcher over a [`SharedCache`].
///
/// Concurrent misses on the same key are not coalesced: each caller fetches
/// and stores its own copy, and the last store wins.
#[derive(Clone)]
pub struct ReadThrough {
    cache: SharedCache,
    fetcher: Arc<dyn Fetcher>,
    /// Deadline around each network fetch, if any
    timeout: Option<Duration>,
}

impl fmt::Debug for ReadThrough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadThrough")
            .field("cache", &self.cache)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ReadThrough {
    pub fn new(cache: SharedCache, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            cache,
            fetcher,
            timeout: None,
        }
    }

    /// Bounds every network fetch by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    // == Fetch Decoded ==
    /// Returns the value for `key`, decoded from JSON.
    ///
    /// # Errors
    /// - [`Error::Fetch`] if the key was not cached and the fetch failed
    /// - [`Error::Decode`] if the payload does not decode into `T`; the raw
    ///   payload stays cached
    pub async fn fetch_decoded<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.fetch_decoded_with_cancel(key, &CancellationToken::new())
            .await
    }

    /// Like [`fetch_decoded`](Self::fetch_decoded), but abandons the network
    /// step when `cancel` fires. Cached hits are served regardless.
    pub async fn fetch_decoded_with_cancel<T: DeserializeOwned>(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let payload = self.fetch_bytes(key, cancel).await?;
        decode(key, &payload)
    }

    // == Fetch Bytes ==
    /// Returns the raw payload for `key`, fetching and caching it on a miss.
    pub async fn fetch_bytes(&self, key: &str, cancel: &CancellationToken) -> Result<Vec<u8>> {
        if let Some(payload) = self.cache.get(key) {
            debug!(key = %key, "cache hit");
            return Ok(payload);
        }

        debug!(key = %key, "cache miss");
        let payload = self
            .fetch_uncached(key, cancel)
            .await
            .map_err(|source| Error::Fetch {
                key: key.to_string(),
                source,
            })?;

        self.cache.add(key, payload.clone());
        Ok(payload)
    }

    async fn fetch_uncached(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<Vec<u8>, TransportError> {
        let fetch = self.fetcher.fetch(key);
        let bounded = async {
            match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, fetch).await {
                    Ok(result) => result,
                    Err(_) => Err(TransportError::Timeout(limit)),
                },
                None => fetch.await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            result = bounded => result,
        }
    }
}

fn decode<T: DeserializeOwned>(key: &str, payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).map_err(|source| Error::Decode {
        key: key.to_string(),
        source,
    })
}
