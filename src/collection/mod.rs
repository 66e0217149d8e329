//! Collection Module
//!
//! Durable record of the creatures a user has caught.

mod sqlite;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Creature;

pub use sqlite::SqliteCollection;

/// Persistent storage for caught creatures, keyed by name.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Stores `creature` under `name`, replacing any earlier record.
    async fn add(&self, name: &str, creature: &Creature) -> Result<()>;

    async fn contains(&self, name: &str) -> Result<bool>;

    /// Removes `name`, returning whether a record existed.
    async fn remove(&self, name: &str) -> Result<bool>;

    /// Every stored creature, ordered by name.
    async fn list(&self) -> Result<Vec<(String, Creature)>>;
}
