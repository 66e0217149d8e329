//! Pokedex - An interactive catalog shell
//!
//! Browses a remote creature catalog through a time-bounded read-through
//! cache with a background TTL sweep.

pub mod api;
pub mod cache;
pub mod collection;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod repl;
pub mod tasks;

pub use api::CatalogClient;
pub use cache::SharedCache;
pub use collection::{CollectionStore, SqliteCollection};
pub use config::Config;
pub use error::{Error, Result, TransportError};
pub use fetch::{Fetcher, HttpFetcher, ReadThrough};
