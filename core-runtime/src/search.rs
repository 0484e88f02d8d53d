//! # Search Core Facade
//!
//! Top-level entry point that owns the shared cache and the active search
//! session.
//!
//! ## Overview
//!
//! [`SearchCore`] wires the configured pieces together: it creates the
//! database pool, wraps it in the SQLite-backed store, and hands out one
//! [`SearchSession`] per query. At most one session is live at a time;
//! starting a search for a new query cancels the previous session before
//! the new one touches the cache, so a slow in-flight fetch from the old
//! query can never land after the new session's clearing refresh.
//!
//! Repeating the current query is not a switch: the live session is
//! returned as-is, keeping its cache and boundary state.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use core_runtime::search::SearchCore;
//!
//! let core = SearchCore::new(config).await?;
//! let session = core.search("rust").await;
//! session.refresh(None).await?;
//! ```

use crate::config::CoreConfig;
use crate::error::Result;
use core_paging::{PagingConfig, RepoPagingSource};
use core_store::{create_pool, SearchStore, SqliteSearchStore};
use core_sync::{SearchSession, SyncCoordinator};
use search_traits::SearchProvider;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Owns the local cache and the active paging session.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct SearchCore {
    store: Arc<dyn SearchStore>,
    provider: Arc<dyn SearchProvider>,
    paging: PagingConfig,
    active: Mutex<Option<Arc<SearchSession>>>,
}

impl SearchCore {
    /// Initializes the core from a validated configuration.
    ///
    /// Creates the connection pool, runs migrations and performs the
    /// startup health check before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the database
    /// cannot be opened and migrated.
    pub async fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        let pool = create_pool(config.database).await?;
        let store: Arc<dyn SearchStore> = Arc::new(SqliteSearchStore::new(pool));

        info!(page_size = config.paging.page_size, "Search core initialized");

        Ok(Self {
            store,
            provider: config.provider,
            paging: config.paging,
            active: Mutex::new(None),
        })
    }

    /// Starts (or resumes) the paging session for `query`.
    ///
    /// If `query` matches the live session, that session is returned
    /// unchanged. Otherwise the previous session is cancelled first and a
    /// fresh session takes its place; its first `refresh` clears the cache
    /// left by the old query.
    pub async fn search(&self, query: impl Into<String>) -> Arc<SearchSession> {
        let query = query.into();
        let mut active = self.active.lock().await;

        if let Some(session) = active.as_ref() {
            if session.query() == query && !session.is_cancelled() {
                debug!(query = %query, "Reusing live session for unchanged query");
                return Arc::clone(session);
            }
        }

        if let Some(previous) = active.take() {
            info!(
                old_query = %previous.query(),
                new_query = %query,
                "Cancelling previous search session"
            );
            previous.cancel();
        }

        let source = RepoPagingSource::new(Arc::clone(&self.provider), query, self.paging);
        let coordinator = SyncCoordinator::new(source, Arc::clone(&self.store));
        let session = Arc::new(SearchSession::new(coordinator, Arc::clone(&self.store)));

        *active = Some(Arc::clone(&session));
        session
    }

    /// The currently live session, if any.
    pub async fn current_session(&self) -> Option<Arc<SearchSession>> {
        self.active.lock().await.clone()
    }
}
