/// `SQLite` database handle
use crate::{accounts, error::Result, StorageError};
use annil_core::AccountDirectory;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Account store backed by `SQLite`
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `database_url` and apply migrations
    ///
    /// # Errors
    /// Returns an error if the connection fails or migrations fail
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::run_migrations(&pool).await?;
        tracing::debug!(url = %database_url, "Account database ready");

        Ok(Self { pool })
    }

    /// Create an in-memory database.
    ///
    /// Every `SQLite` connection to `:memory:` is its own database, so the pool
    /// is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Create database from an existing, already migrated pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        const MIGRATIONS: &[&str] = &[
            include_str!("../migrations/20240101000001_create_users.sql"),
            include_str!("../migrations/20240101000002_create_invite_codes.sql"),
        ];

        for migration in MIGRATIONS {
            sqlx::query(migration)
                .execute(pool)
                .await
                .map_err(|e| StorageError::Migration(e.to_string()))?;
        }

        Ok(())
    }
}

#[async_trait]
impl AccountDirectory for Database {
    async fn account_exists(&self, username: &str) -> annil_core::Result<bool> {
        Ok(accounts::exists(&self.pool, username).await?)
    }

    async fn registration_time(&self, username: &str) -> annil_core::Result<Option<DateTime<Utc>>> {
        Ok(accounts::registration_time(&self.pool, username).await?)
    }

    async fn share_capability(&self, username: &str) -> annil_core::Result<bool> {
        Ok(accounts::allow_share(&self.pool, username).await?)
    }
}
