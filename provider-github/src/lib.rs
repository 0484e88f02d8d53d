//! # GitHub Provider
//!
//! Implements the `SearchProvider` trait for the GitHub REST search API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Repository search ordered by stars with 1-based page tokens
//! - A fixed query qualifier restricting matches to name/description
//! - A reqwest-backed `HttpClient` with retry and exponential backoff
//! - Optional bearer token authentication
//!
//! ## Usage
//!
//! ```ignore
//! use provider_github::{GithubSearchProvider, ReqwestHttpClient};
//! use search_traits::SearchProvider;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new());
//! let provider = GithubSearchProvider::new(http_client);
//! let page = provider.search_repos("tetris", 1, 50).await?;
//! ```

mod client;
mod http;
mod types;

pub use client::GithubSearchProvider;
pub use http::ReqwestHttpClient;
pub use types::{ApiErrorBody, RepoSearchResponse};
