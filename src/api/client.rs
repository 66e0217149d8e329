//! Catalog Client
//!
//! Typed lookups against the catalog API. Every lookup is keyed by its full
//! URL and served through the read-through cache.

use tracing::instrument;

use crate::error::{Error, Result};
use crate::fetch::ReadThrough;
use crate::models::{Creature, LocationArea, LocationPage};

/// Client for the location and creature endpoints of the catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    reader: ReadThrough,
    /// API root, always ending in `/`
    base_url: String,
}

impl CatalogClient {
    /// Creates a client rooted at `base_url`, e.g. `https://pokeapi.co/api/v2/`.
    pub fn new(reader: ReadThrough, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self { reader, base_url }
    }

    pub fn reader(&self) -> &ReadThrough {
        &self.reader
    }

    // == URLs ==
    /// URL of the first page of the location-area listing.
    pub fn first_location_page_url(&self) -> String {
        format!("{}location-area/", self.base_url)
    }

    pub fn location_area_url(&self, name: &str) -> String {
        format!("{}location-area/{}/", self.base_url, name)
    }

    pub fn creature_url(&self, name: &str) -> String {
        format!("{}pokemon/{}/", self.base_url, name)
    }

    // == Lookups ==
    /// Fetches the location page at `url`, as found in a page's `next`/`previous`.
    #[instrument(skip(self))]
    pub async fn location_page(&self, url: &str) -> Result<LocationPage> {
        self.reader.fetch_decoded(url).await
    }

    pub async fn first_location_page(&self) -> Result<LocationPage> {
        self.location_page(&self.first_location_page_url()).await
    }

    #[instrument(skip(self))]
    pub async fn location_area(&self, name: &str) -> Result<LocationArea> {
        let name = normalize_name(name)?;
        self.reader.fetch_decoded(&self.location_area_url(&name)).await
    }

    #[instrument(skip(self))]
    pub async fn creature(&self, name: &str) -> Result<Creature> {
        let name = normalize_name(name)?;
        self.reader.fetch_decoded(&self.creature_url(&name)).await
    }
}

/// Lower-cases and trims a resource name, rejecting empty names.
fn normalize_name(name: &str) -> Result<String> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return Err(Error::InvalidArgument("name cannot be empty".to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SharedCache;
    use crate::error::TransportError;
    use crate::fetch::Fetcher;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Serves canned bodies by URL and records every requested URL.
    #[derive(Default)]
    struct CannedFetcher {
        bodies: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Fetcher for CannedFetcher {
        async fn fetch(&self, key: &str) -> std::result::Result<Vec<u8>, TransportError> {
            self.requested.lock().unwrap().push(key.to_string());
            self.bodies
                .get(key)
                .map(|body| body.clone().into_bytes())
                .ok_or(TransportError::Status(404))
        }
    }

    async fn client_with(bodies: &[(&str, &str)]) -> (CatalogClient, Arc<CannedFetcher>) {
        let fetcher = Arc::new(CannedFetcher {
            bodies: bodies
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        });
        let cache = SharedCache::start(Duration::from_secs(60)).await;
        let client = CatalogClient::new(ReadThrough::new(cache, fetcher.clone()), "http://catalog/api");
        (client, fetcher)
    }

    #[tokio::test]
    async fn test_urls() {
        let (client, _) = client_with(&[]).await;

        assert_eq!(client.first_location_page_url(), "http://catalog/api/location-area/");
        assert_eq!(
            client.location_area_url("eterna-city-area"),
            "http://catalog/api/location-area/eterna-city-area/"
        );
        assert_eq!(client.creature_url("pikachu"), "http://catalog/api/pokemon/pikachu/");
    }

    #[tokio::test]
    async fn test_creature_lookup_is_cached() {
        let (client, fetcher) = client_with(&[(
            "http://catalog/api/pokemon/pikachu/",
            r#"{"id": 25, "name": "pikachu", "base_experience": 112}"#,
        )])
        .await;

        let first = client.creature(" Pikachu ").await.unwrap();
        let second = client.creature("pikachu").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.base_experience, 112);
        assert_eq!(fetcher.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_area_is_fetch_error() {
        let (client, _) = client_with(&[]).await;

        let err = client.location_area("nowhere").await.unwrap_err();
        assert_eq!(err.key(), Some("http://catalog/api/location-area/nowhere/"));
        assert!(matches!(
            err,
            Error::Fetch {
                source: TransportError::Status(404),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_name_rejected_without_fetch() {
        let (client, fetcher) = client_with(&[]).await;

        assert!(matches!(
            client.creature("   ").await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(fetcher.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_first_location_page() {
        let (client, _) = client_with(&[(
            "http://catalog/api/location-area/",
            r#"{"count": 2, "next": null, "previous": null,
                "results": [{"name": "a", "url": ""}, {"name": "b", "url": ""}]}"#,
        )])
        .await;

        let page = client.first_location_page().await.unwrap();
        assert_eq!(page.results.len(), 2);
        assert!(page.next.is_none());
    }
}
