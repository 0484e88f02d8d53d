//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the search core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - The [`SearchCore`](search::SearchCore) facade owning the active session
//!
//! ## Overview
//!
//! This crate is the assembly point of the workspace. The lower crates
//! (`core-store`, `core-paging`, `core-sync`) know nothing about each
//! other's construction; this crate builds the pool, the store, and the
//! per-query sessions from one validated [`CoreConfig`](config::CoreConfig),
//! and establishes the logging conventions used throughout the system.

pub mod config;
pub mod error;
pub mod logging;
pub mod search;

pub use error::{Error, Result};
