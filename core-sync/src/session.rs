//! # Search Session
//!
//! One live pagination session for one query.
//!
//! ## Overview
//!
//! The `SearchSession` wraps a [`SyncCoordinator`] with the per-session
//! concurrency policy:
//! - At most one in-flight fetch per direction; a request for a busy
//!   direction is coalesced, not queued
//! - Boundary latching: once a direction reports "no more data", further
//!   requests in that direction return immediately without touching the
//!   store or the network, until the next refresh
//! - Refresh load-state publishing over a watch channel, folded into
//!   [`RemotePresentationState`]s for consumers that react once per
//!   presented refresh
//! - Cancellation: tearing the session down aborts in-flight loads and
//!   keeps late responses from ever committing
//!
//! A session only ever reads the cache; all writes go through the
//! coordinator it owns. Run one live session per store at a time and
//! cancel it before starting the next query's session.

use crate::coordinator::{SyncCoordinator, SyncOutcome};
use crate::Result;
use core_paging::{
    presentation_states, CombinedLoadStates, LoadDirection, LoadState, RemotePresentationState,
};
use core_store::{Page, PageRequest, RepoStore, SearchStore};
use futures::{stream, Stream};
use search_traits::Repo;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, instrument};

/// A query's live pagination session.
pub struct SearchSession {
    coordinator: SyncCoordinator,

    /// Cache the consumer pages over
    store: Arc<dyn SearchStore>,

    /// Per-direction guards; `try_lock` failure means a fetch for that
    /// direction is in flight and the new request coalesces into it
    refresh_guard: Mutex<()>,
    prepend_guard: Mutex<()>,
    append_guard: Mutex<()>,

    /// Latched when a direction reports end of pagination; cleared by
    /// the next successful refresh
    prepend_ended: AtomicBool,
    append_ended: AtomicBool,

    /// Latest refresh load-state snapshot
    load_states: watch::Sender<CombinedLoadStates>,
}

impl SearchSession {
    pub fn new(coordinator: SyncCoordinator, store: Arc<dyn SearchStore>) -> Self {
        let (load_states, _) = watch::channel(CombinedLoadStates::idle());

        Self {
            coordinator,
            store,
            refresh_guard: Mutex::new(()),
            prepend_guard: Mutex::new(()),
            append_guard: Mutex::new(()),
            prepend_ended: AtomicBool::new(false),
            append_ended: AtomicBool::new(false),
            load_states,
        }
    }

    /// The query this session pages over
    pub fn query(&self) -> &str {
        self.coordinator.query()
    }

    /// Replace the cache with a page fetched near the consumer's
    /// position.
    ///
    /// `anchor` is the id of the cached repo closest to where the
    /// consumer currently is; pass `None` to start from the beginning.
    /// A successful refresh re-arms both boundary latches.
    #[instrument(skip(self), fields(query = %self.coordinator.query()))]
    pub async fn refresh(&self, anchor: Option<i64>) -> Result<SyncOutcome> {
        let Ok(_guard) = self.refresh_guard.try_lock() else {
            debug!("Refresh already in flight, coalescing");
            return Ok(SyncOutcome::AlreadyInFlight);
        };

        self.load_states
            .send_modify(|states| states.remote_refresh = LoadState::Loading);

        let result = self.coordinator.load(LoadDirection::Refresh, anchor).await;

        match &result {
            Ok(SyncOutcome::Success {
                end_of_pagination_reached,
            }) => {
                self.prepend_ended
                    .store(*end_of_pagination_reached, Ordering::SeqCst);
                self.append_ended
                    .store(*end_of_pagination_reached, Ordering::SeqCst);
                self.load_states
                    .send_modify(|states| states.remote_refresh = LoadState::NotLoading);
            }
            Ok(SyncOutcome::Discarded) | Ok(SyncOutcome::AlreadyInFlight) => {
                self.load_states
                    .send_modify(|states| states.remote_refresh = LoadState::NotLoading);
            }
            Err(_) => {
                self.load_states
                    .send_modify(|states| states.remote_refresh = LoadState::Error);
            }
        }

        result
    }

    /// Extend the cache before its first item.
    pub async fn prepend(&self) -> Result<SyncOutcome> {
        if self.prepend_ended.load(Ordering::SeqCst) {
            debug!("Prepend boundary latched, skipping");
            return Ok(SyncOutcome::Success {
                end_of_pagination_reached: true,
            });
        }

        let Ok(_guard) = self.prepend_guard.try_lock() else {
            debug!("Prepend already in flight, coalescing");
            return Ok(SyncOutcome::AlreadyInFlight);
        };

        let outcome = self.coordinator.load(LoadDirection::Prepend, None).await?;

        if let SyncOutcome::Success {
            end_of_pagination_reached: true,
        } = outcome
        {
            self.prepend_ended.store(true, Ordering::SeqCst);
        }

        Ok(outcome)
    }

    /// Extend the cache after its last item.
    pub async fn append(&self) -> Result<SyncOutcome> {
        if self.append_ended.load(Ordering::SeqCst) {
            debug!("Append boundary latched, skipping");
            return Ok(SyncOutcome::Success {
                end_of_pagination_reached: true,
            });
        }

        let Ok(_guard) = self.append_guard.try_lock() else {
            debug!("Append already in flight, coalescing");
            return Ok(SyncOutcome::AlreadyInFlight);
        };

        let outcome = self.coordinator.load(LoadDirection::Append, None).await?;

        if let SyncOutcome::Success {
            end_of_pagination_reached: true,
        } = outcome
        {
            self.append_ended.store(true, Ordering::SeqCst);
        }

        Ok(outcome)
    }

    /// One ordered window of the cached result set.
    pub async fn snapshot(&self, request: PageRequest) -> Result<Page<Repo>> {
        let page = self
            .store
            .repos_by_name(self.coordinator.query(), request)
            .await?;
        Ok(page)
    }

    /// Subscribe to refresh load-state snapshots.
    pub fn load_states(&self) -> watch::Receiver<CombinedLoadStates> {
        self.load_states.subscribe()
    }

    /// Report the local source's own reload state.
    ///
    /// The consumer drives this leg: only it knows when its re-read of
    /// committed data starts and finishes.
    pub fn set_source_refresh(&self, state: LoadState) {
        self.load_states
            .send_modify(|states| states.source_refresh = state);
    }

    /// Presentation states folded from this session's load states.
    ///
    /// Emits [`RemotePresentationState::Initial`] up front, then one
    /// state per transition, with consecutive duplicates suppressed.
    pub fn presentation_states(&self) -> impl Stream<Item = RemotePresentationState> {
        let receiver = self.load_states.subscribe();
        let snapshots = stream::unfold(receiver, |mut receiver| async move {
            match receiver.changed().await {
                Ok(()) => {
                    let snapshot = *receiver.borrow_and_update();
                    Some((snapshot, receiver))
                }
                // Session dropped; end the stream
                Err(_) => None,
            }
        });

        presentation_states(snapshots)
    }

    /// Abort in-flight loads and refuse all further commits.
    pub fn cancel(&self) {
        self.coordinator.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.coordinator.is_cancelled()
    }
}
