//! # Remote Sync Module
//!
//! Keeps the local search cache in step with the remote search service.
//!
//! ## Overview
//!
//! This crate owns the write path of paginated search:
//! - Resolving which remote page token continues a refresh, prepend or
//!   append, from the per-item remote key table
//! - Fetching that page and committing items plus key records in one
//!   transaction
//! - Discarding stale responses that were fetched before a refresh
//!   invalidated the cache
//! - Per-session policy: in-flight coalescing per direction, boundary
//!   latching, refresh load-state publishing, cancellation on query
//!   switch
//!
//! ## Components
//!
//! - **Sync Coordinator** (`coordinator`): one invocation = one directional
//!   load, token resolution through atomic commit
//! - **Search Session** (`session`): a query's live session wrapping the
//!   coordinator with guards, latches and load states

pub mod coordinator;
pub mod error;
pub mod session;

pub use coordinator::{SyncCoordinator, SyncOutcome};
pub use error::{Result, SyncError};
pub use session::SearchSession;
