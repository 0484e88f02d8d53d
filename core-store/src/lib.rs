//! # Search Cache Store
//!
//! Owns the SQLite database backing paginated search: cached repositories
//! and the remote continuation keys that drive directional loads.
//!
//! ## Overview
//!
//! This crate manages:
//! - SQLite schema and migrations for the `repos` and `remote_keys` tables
//! - Pooled connections (WAL mode, foreign keys, health checks)
//! - Store traits ([`RepoStore`], [`RemoteKeyStore`], [`SearchStore`]) and
//!   their SQLite implementation
//! - Windowed reads with [`PageRequest`]/[`Page`]
//!
//! The write path is designed around one rule: a fetched remote page is
//! applied through [`SearchStore::commit_page`] in a single transaction,
//! so the repo cache and its keys can never drift apart.

pub mod db;
pub mod error;
pub mod models;
pub mod pagination;
pub mod store;

pub use db::{create_pool, create_test_pool, DatabaseConfig};
pub use error::{Result, StoreError};
pub use models::RemoteKey;
pub use pagination::{Page, PageRequest};
pub use store::{PageCommit, RemoteKeyStore, RepoStore, SearchStore, SqliteSearchStore};
