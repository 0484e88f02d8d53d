//! # Sync Coordinator
//!
//! Turns "the consumer ran out of cached data in direction D" into a
//! remote fetch and an atomic cache commit.
//!
//! ## Overview
//!
//! The `SyncCoordinator` is the only writer of the search cache. Per
//! invocation it:
//! - Resolves the page token for the requested direction from the
//!   remote key table (refresh: near the consumer's anchor; prepend:
//!   the first cached item's previous token; append: the last cached
//!   item's next token)
//! - Short-circuits with "no more data" when the directional token is
//!   absent, without touching the network
//! - Fetches the page through the `RepoPagingSource`
//! - Commits items and their derived key records in one transaction,
//!   clearing both tables first on refresh
//! - Reports whether the pagination boundary was reached (an empty
//!   fetch is the definitive end of a direction)
//!
//! ## Staleness and cancellation
//!
//! Every refresh bumps a generation counter. A load remembers the
//! generation it started under and re-checks it under the commit gate,
//! so a slow prepend/append response fetched before a refresh can never
//! land on top of the refreshed cache; it is discarded instead.
//! Cancelling the coordinator aborts in-flight fetches and refuses any
//! further commits.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_paging::{LoadDirection, PagingConfig, RepoPagingSource};
//! use core_sync::{SyncCoordinator, SyncOutcome};
//!
//! let source = RepoPagingSource::new(provider, "tetris", PagingConfig::default());
//! let coordinator = SyncCoordinator::new(source, store);
//!
//! match coordinator.load(LoadDirection::Refresh, None).await? {
//!     SyncOutcome::Success { end_of_pagination_reached } => { /* re-read cache */ }
//!     SyncOutcome::Discarded => { /* superseded by a newer refresh */ }
//!     SyncOutcome::AlreadyInFlight => { /* coalesced upstream */ }
//! }
//! ```

use crate::{Result, SyncError};
use core_paging::{LoadDirection, LoadParams, RepoPagingSource};
use core_store::{PageCommit, RemoteKey, RemoteKeyStore, RepoStore, SearchStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Result of one coordinator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The page was fetched and committed, or the direction was already
    /// exhausted and there was nothing to fetch.
    Success { end_of_pagination_reached: bool },

    /// A refresh invalidated this load between its fetch and its
    /// commit; nothing was written.
    Discarded,

    /// The direction already has a fetch in flight and the request was
    /// coalesced into it.
    AlreadyInFlight,
}

/// Orchestrates remote fetches against the local search cache.
///
/// One coordinator serves one query. The consumer never writes to the
/// stores directly; it only reads them and calls [`SyncCoordinator::load`]
/// when a boundary is reached.
pub struct SyncCoordinator {
    /// Fetches pages and derives their continuation keys
    source: RepoPagingSource,

    /// Cache written by `load` and read back by the consumer
    store: Arc<dyn SearchStore>,

    /// Bumped by every refresh; a load only commits if the generation
    /// it started under is still current
    generation: AtomicU64,

    /// Makes the generation re-check and the commit one critical
    /// section
    commit_gate: Mutex<()>,

    /// Set when the session owning this coordinator is torn down
    cancel: CancellationToken,
}

impl SyncCoordinator {
    pub fn new(source: RepoPagingSource, store: Arc<dyn SearchStore>) -> Self {
        Self {
            source,
            store,
            generation: AtomicU64::new(0),
            commit_gate: Mutex::new(()),
            cancel: CancellationToken::new(),
        }
    }

    /// The query this coordinator pages over
    pub fn query(&self) -> &str {
        self.source.query()
    }

    /// Abort in-flight loads and refuse all further commits.
    ///
    /// Called when the consumer switches to a new query: a cancelled
    /// coordinator can no longer write, so a late response from the old
    /// session cannot land after the new session's refresh clear.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run one load in `direction` and commit the result.
    ///
    /// `anchor` is the id of the cached repo closest to the consumer's
    /// current position; only a refresh consults it, to keep scroll
    /// continuity across invalidation.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Fetch`] when the remote fetch fails; the stores
    ///   are untouched and the same token will be re-resolved on retry
    /// - [`SyncError::EmptyPagingState`] / [`SyncError::MissingBoundaryKey`]
    ///   when a directional load is issued before any page was committed
    /// - [`SyncError::Cancelled`] after [`SyncCoordinator::cancel`]
    #[instrument(skip(self), fields(query = %self.source.query()))]
    pub async fn load(&self, direction: LoadDirection, anchor: Option<i64>) -> Result<SyncOutcome> {
        // A superseded session fails fast instead of reporting whatever
        // state the new session left in the cache
        if self.cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        // A refresh invalidates everything fetched before it, including
        // loads still in flight
        let generation = match direction {
            LoadDirection::Refresh => self.generation.fetch_add(1, Ordering::SeqCst) + 1,
            LoadDirection::Prepend | LoadDirection::Append => {
                self.generation.load(Ordering::SeqCst)
            }
        };

        let token = match self.resolve_token(direction, anchor).await? {
            Some(token) => token,
            None => {
                debug!(%direction, "Boundary token absent, no more data");
                return Ok(SyncOutcome::Success {
                    end_of_pagination_reached: true,
                });
            }
        };

        let params = LoadParams::new(Some(token), self.source.config().page_size);

        let page = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(SyncError::Cancelled),
            loaded = self.source.load(&params) => loaded?,
        };

        let end_of_pagination_reached = page.repos.is_empty();
        let keys: Vec<RemoteKey> = page
            .repos
            .iter()
            .map(|repo| RemoteKey {
                repo_id: repo.id,
                prev_key: page.prev_key,
                next_key: page.next_key,
            })
            .collect();

        let _gate = self.commit_gate.lock().await;

        if self.cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        if self.generation.load(Ordering::SeqCst) != generation {
            info!(%direction, token, "Discarding page fetched before a refresh");
            return Ok(SyncOutcome::Discarded);
        }

        self.store
            .commit_page(PageCommit {
                clear_existing: direction == LoadDirection::Refresh,
                repos: page.repos,
                keys,
            })
            .await?;

        debug!(%direction, token, end_of_pagination_reached, "Committed page");

        Ok(SyncOutcome::Success {
            end_of_pagination_reached,
        })
    }

    /// Resolve the page token for `direction` from the key table.
    ///
    /// `Ok(None)` means the direction is exhausted: the boundary item's
    /// token says there is nothing further, so no fetch should happen.
    async fn resolve_token(
        &self,
        direction: LoadDirection,
        anchor: Option<i64>,
    ) -> Result<Option<u32>> {
        let starting_page = self.source.config().starting_page;

        match direction {
            LoadDirection::Refresh => {
                // Continue one page before the anchor's next token when
                // its key record survived, else start over
                let token = match anchor {
                    Some(repo_id) => self
                        .store
                        .remote_key(repo_id)
                        .await?
                        .and_then(|key| key.next_key)
                        .map(|next| next.saturating_sub(1).max(starting_page))
                        .unwrap_or(starting_page),
                    None => starting_page,
                };
                Ok(Some(token))
            }
            LoadDirection::Prepend => {
                let first = self
                    .store
                    .first_repo(self.source.query())
                    .await?
                    .ok_or(SyncError::EmptyPagingState { direction })?;
                let key = self
                    .store
                    .remote_key(first.id)
                    .await?
                    .ok_or(SyncError::MissingBoundaryKey { repo_id: first.id })?;
                Ok(key.prev_key)
            }
            LoadDirection::Append => {
                let last = self
                    .store
                    .last_repo(self.source.query())
                    .await?
                    .ok_or(SyncError::EmptyPagingState { direction })?;
                let key = self
                    .store
                    .remote_key(last.id)
                    .await?
                    .ok_or(SyncError::MissingBoundaryKey { repo_id: last.id })?;
                Ok(key.next_key)
            }
        }
    }
}
