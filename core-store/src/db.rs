//! # Search Cache Database
//!
//! Owns the SQLite pool behind the repo cache and the remote-key table.
//!
//! ## Overview
//!
//! The cache is a single SQLite file (or `:memory:` in tests) opened in WAL
//! mode, so readers observe either the fully-pre-commit or fully-post-commit
//! state of a page write, never an interleaving. Opening the pool also runs
//! the embedded migrations and a connectivity probe, so callers get back a
//! pool that is ready for queries or an error, nothing in between.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_store::db::{create_pool, DatabaseConfig};
//!
//! let pool = create_pool(DatabaseConfig::new("search_cache.db")).await?;
//! ```
//!
//! Tests should use [`create_test_pool`], which applies the schema to a
//! fresh in-memory database.

use crate::{Result, StoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Connection pool settings for the cache database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `sqlite:` URL of the cache file, or `sqlite::memory:`
    pub database_url: String,

    /// Connections the pool keeps open even when idle
    pub min_connections: u32,

    /// Upper bound on open connections
    pub max_connections: u32,

    /// How long to wait for a free connection before giving up
    pub acquire_timeout: Duration,

    /// Recycle connections older than this
    pub max_lifetime: Option<Duration>,

    /// Close connections idle longer than this
    pub idle_timeout: Option<Duration>,
}

impl DatabaseConfig {
    /// Configuration for a file-backed cache at `database_path`.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_url: format!("sqlite:{}", database_path.into().display()),
            max_lifetime: Some(Duration::from_secs(30 * 60)),
            idle_timeout: Some(Duration::from_secs(10 * 60)),
            ..Self::in_memory()
        }
    }

    /// Configuration for an in-memory cache.
    ///
    /// Each `sqlite::memory:` connection is its own database, so these
    /// connections are never recycled and pools over this URL should be
    /// capped at one connection (see [`create_test_pool`]).
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: None,
            idle_timeout: None,
        }
    }

    /// Set the minimum number of pooled connections
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Set the maximum number of pooled connections
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the acquire timeout
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Recycle connections after this lifetime
    pub fn max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    /// Set the idle timeout
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Open the cache database and return a ready pool.
///
/// Connects with WAL journaling and foreign keys on, creating the file if
/// it does not exist, then applies pending migrations and probes the
/// connection. A pool returned from here needs no further setup.
///
/// # Errors
///
/// Returns [`StoreError::Database`] when the file cannot be opened or the
/// probe fails, and [`StoreError::Migration`] when a migration does not
/// apply.
pub async fn create_pool(config: DatabaseConfig) -> Result<Pool<Sqlite>> {
    info!(
        database_url = %config.database_url,
        max_connections = config.max_connections,
        "Opening search cache"
    );

    let options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(StoreError::Database)?
        // WAL keeps page commits invisible to readers until they complete
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect_with(options)
        .await
        .map_err(|e| {
            warn!(error = %e, "Could not open the cache database");
            StoreError::Database(e)
        })?;

    apply_migrations(&pool).await?;
    probe(&pool).await?;

    info!(connections = pool.size(), "Search cache ready");
    Ok(pool)
}

/// In-memory pool with the schema applied, for tests.
///
/// Capped at a single connection: every new `sqlite::memory:` connection
/// opens a separate empty database, so a second connection would not see
/// the migrated schema.
pub async fn create_test_pool() -> Result<Pool<Sqlite>> {
    create_pool(DatabaseConfig::in_memory().max_connections(1)).await
}

/// Bring the schema up to date from the migrations embedded at compile
/// time (`sqlx::migrate!`).
async fn apply_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    debug!("Applying cache migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Cache migration failed");
            StoreError::Migration(e.to_string())
        })?;

    Ok(())
}

/// Cheap connectivity check so a broken pool fails at startup, not on the
/// first search.
async fn probe(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(|e| {
        warn!(error = %e, "Cache connectivity probe failed");
        StoreError::Database(e)
    })?;

    Ok(())
}
