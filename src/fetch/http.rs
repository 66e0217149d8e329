//! HTTP Fetcher
//!
//! [`Fetcher`] implementation that treats the cache key as a URL and returns
//! the response body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::TransportError;
use crate::fetch::Fetcher;

/// Fetches raw response bodies over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// Reusable HTTP client with connection pooling
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pokedex/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, TransportError> {
        let response = self.client.get(key).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        debug!(url = %key, bytes = body.len(), "fetched");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpFetcher::new(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_is_request_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(TransportError::Request(_))));
    }
}
