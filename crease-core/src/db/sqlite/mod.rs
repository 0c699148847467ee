//! SQLite store backend
//!
//! The durable option: sqlx over a SQLite pool, schema created in code on
//! first open. Referential integrity and the cascade on player delete are
//! enforced by the schema (`PRAGMA foreign_keys`, `ON DELETE CASCADE`);
//! the current-assessment invariant step runs inside a transaction.

mod assessments;
mod metrics;
mod players;
mod problem_areas;
mod schema;
mod videos;

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// SQLite implementation of the five store traits.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and create any missing
    /// tables.
    pub async fn open(path: &Path) -> Result<Self> {
        let newly_created = !path.exists();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
            .map_err(sqlx::Error::from)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        if newly_created {
            info!("Initialized new database: {}", path.display());
        } else {
            info!("Opened existing database: {}", path.display());
        }

        schema::create_all_tables(&pool).await?;
        Ok(Self { pool })
    }

    /// Create an in-memory database, for tests and ephemeral use.
    ///
    /// A single connection is mandatory: every pooled connection would
    /// otherwise see its own empty `:memory:` database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(sqlx::Error::from)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        schema::create_all_tables(&pool).await?;
        Ok(Self { pool })
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
