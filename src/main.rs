//! Pokedex - An interactive catalog shell
//!
//! Browses a remote creature catalog through a time-bounded read-through cache.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokedex::repl::{self, Session};
use pokedex::{CatalogClient, Config, HttpFetcher, ReadThrough, SharedCache, SqliteCollection};

/// Main entry point for the Pokedex shell.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr)
/// 2. Load configuration from `.env` and environment variables
/// 3. Start the response cache and its TTL sweep task
/// 4. Open the collection store and load caught creatures
/// 5. Build the HTTP fetcher and catalog client
/// 6. Run the shell until `exit`, end of input, or Ctrl+C
/// 7. Stop the sweep task and close the store
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokedex=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // A missing .env file is fine, the process environment still applies
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_ttl={}ms, catalog_base_url={}, fetch_timeout={}s, database_url={}",
        config.cache_ttl_ms, config.catalog_base_url, config.fetch_timeout_secs, config.database_url
    );

    let cache = SharedCache::start(config.cache_ttl()).await;
    info!("Response cache started");

    let store = Arc::new(
        SqliteCollection::connect(&config.database_url)
            .await
            .context("failed to open collection store")?,
    );

    let fetcher = HttpFetcher::new(config.fetch_timeout()).context("failed to build HTTP client")?;
    let reader =
        ReadThrough::new(cache.clone(), Arc::new(fetcher)).with_timeout(config.fetch_timeout());
    let client = CatalogClient::new(reader, config.catalog_base_url.clone());
    let mut session = Session::new(client, store.clone());
    session
        .load_collection()
        .await
        .context("failed to load caught creatures")?;

    let lines = repl::stdin_lines().context("failed to start stdin reader")?;
    let mut stdout = std::io::stdout();

    let result = repl::run_until(&mut session, lines, &mut stdout, async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down..."),
            Err(e) => {
                warn!("Cannot listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await
            }
        }
    })
    .await;

    cache.shutdown().await;
    store.close().await;
    info!("Shutdown complete");
    result.context("shell terminated")
}
