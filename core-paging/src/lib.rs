//! # Pagination Core
//!
//! Query-bound paging over a remote search provider.
//!
//! ## Overview
//!
//! This crate holds the pieces of pagination that carry no I/O of their
//! own:
//!
//! - [`RepoPagingSource`](source::RepoPagingSource) - fetches one page per
//!   call and derives the page's continuation keys positionally
//! - [`PagingConfig`](config::PagingConfig) - page size and starting-page
//!   sentinel, passed explicitly instead of living in globals
//! - [`LoadParams`](load::LoadParams) / [`LoadedPage`](load::LoadedPage) -
//!   the load request/result vocabulary shared with the sync layer
//! - [`presentation_states`](state::presentation_states) - folds load-state
//!   snapshots into the refresh presentation cycle
//!
//! Token resolution against cached boundaries, commits, and retry policy
//! all live a layer up in `core-sync`; sources stay stateless so a failed
//! load can be retried by simply calling again.

pub mod config;
pub mod load;
pub mod source;
pub mod state;

pub use config::PagingConfig;
pub use load::{LoadDirection, LoadParams, LoadedPage};
pub use source::RepoPagingSource;
pub use state::{
    advance, presentation_states, CombinedLoadStates, LoadState, RemotePresentationState,
};
