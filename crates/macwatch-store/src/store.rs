//! SQLite connection management and schema creation.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::Result;

/// Handle to the macwatch SQLite database.
///
/// Acquired once at process start and passed into the registry
/// constructors. Clone is cheap (inner pool Arc).
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open the database file at `path`, creating it if missing.
    pub async fn open(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(path)
            .unwrap_or_else(|_| SqliteConnectOptions::new().filename(path))
            .create_if_missing(true);

        // One connection: a reconciliation pass is strictly sequential and
        // SQLite writes are serialized anyway.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        tracing::info!(path, "Opened device store");
        Ok(Self { pool })
    }

    /// Open a private in-memory database. Used by tests.
    ///
    /// The single pooled connection keeps the memory database alive for the
    /// lifetime of the handle.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// The underlying connection pool, for registry constructors.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create both registry tables if they do not exist.
    ///
    /// MAC uniqueness within a table is a schema constraint; uniqueness
    /// across the two tables is restored by the reconciliation pass.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS known (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                mac TEXT NOT NULL UNIQUE,
                ip TEXT,
                created_at TEXT NOT NULL
                    DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS unknown (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ip TEXT NOT NULL,
                mac TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
                    DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await?;

        tracing::debug!("Registry schema ready");
        Ok(())
    }
}
