//! Fetch Module
//!
//! Read-through access to remote data: a pluggable fetch capability and the
//! cache-first fetcher that every catalog lookup goes through.

mod http;
mod read_through;

use async_trait::async_trait;

use crate::error::TransportError;

pub use http::HttpFetcher;
pub use read_through::ReadThrough;

// == Fetcher Trait ==
/// Capability that produces the raw bytes for a key.
///
/// The key is opaque to the cache; in practice it is a fully-qualified URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, TransportError>;
}
