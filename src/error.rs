//! Error types for the catalog shell
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

// == Transport Error Enum ==
/// Failure of the underlying fetch capability to produce bytes for a key.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP request could not be sent or its body could not be read
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("unexpected status {0}")]
    Status(u16),

    /// The configured deadline elapsed before the fetch completed
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the fetch
    #[error("cancelled")]
    Cancelled,

    /// Any other failure reported by a fetcher
    #[error("{0}")]
    Other(String),
}

// == Error Enum ==
/// Unified error type for the catalog shell.
#[derive(Error, Debug)]
pub enum Error {
    /// The data source could not be reached for `key`
    #[error("failed to fetch {key}: {source}")]
    Fetch {
        key: String,
        #[source]
        source: TransportError,
    },

    /// The payload stored for `key` does not decode into the expected shape
    #[error("failed to decode {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A shell command was given bad arguments
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The collection store could not be read or written
    #[error("collection store error: {0}")]
    Storage(#[from] sqlx::Error),

    /// A creature record in the collection store is not valid JSON
    #[error("bad collection record for {name}: {source}")]
    Record {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Writing shell output failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the cache key the error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::Fetch { key, .. } | Error::Decode { key, .. } => Some(key.as_str()),
            Error::InvalidArgument(_)
            | Error::Storage(_)
            | Error::Record { .. }
            | Error::Io(_) => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the catalog shell.
pub type Result<T> = std::result::Result<T, Error>;
