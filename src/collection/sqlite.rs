//! SQLite Collection Store
//!
//! Keeps each caught creature as one row holding its catalog JSON.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::collection::CollectionStore;
use crate::error::{Error, Result};
use crate::models::Creature;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS caught_creatures (
        name TEXT PRIMARY KEY NOT NULL,
        data TEXT NOT NULL
    )
"#;

/// [`CollectionStore`] backed by a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteCollection {
    pool: SqlitePool,
}

impl SqliteCollection {
    /// Opens (creating if missing) the database at `database_url`,
    /// e.g. `sqlite:pokedex.db`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.create_schema().await?;
        info!(url = %database_url, "Collection store opened");
        Ok(store)
    }

    /// Opens a private in-memory database that lives as long as the store.
    pub async fn in_memory() -> Result<Self> {
        // One connection that never idles out, so the database is not dropped
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.create_schema().await?;
        Ok(store)
    }

    async fn create_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CollectionStore for SqliteCollection {
    async fn add(&self, name: &str, creature: &Creature) -> Result<()> {
        let data = serde_json::to_string(creature).map_err(|source| Error::Record {
            name: name.to_string(),
            source,
        })?;

        sqlx::query(
            r#"
            INSERT INTO caught_creatures (name, data) VALUES (?, ?)
            ON CONFLICT(name) DO UPDATE SET data = excluded.data
            "#,
        )
        .bind(name)
        .bind(data)
        .execute(&self.pool)
        .await?;

        debug!(creature = %name, "stored");
        Ok(())
    }

    async fn contains(&self, name: &str) -> Result<bool> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT 1 FROM caught_creatures WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    async fn remove(&self, name: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM caught_creatures WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<(String, Creature)>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT name, data FROM caught_creatures ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(name, data)| match serde_json::from_str(&data) {
                Ok(creature) => Ok((name, creature)),
                Err(source) => Err(Error::Record { name, source }),
            })
            .collect()
    }
}
