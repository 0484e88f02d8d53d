//! # Search Boundary Traits
//!
//! Contracts between the pagination core and the outside world.
//!
//! ## Overview
//!
//! This crate defines the two seams the core depends on but does not
//! implement itself:
//!
//! - [`SearchProvider`](provider::SearchProvider) - one page of repository
//!   search results from a remote service, by query text, 1-based page
//!   number and page size. Concrete backends live in `provider-*` crates.
//! - [`HttpClient`](http::HttpClient) - the narrow HTTP surface those
//!   backends are written against, so transport can be swapped or mocked.
//!
//! Alongside the traits live the shared wire/domain types: [`Repo`](model::Repo)
//! (deserializes directly from the search API's JSON) and
//! [`SearchPage`](provider::SearchPage).
//!
//! ## Error Handling
//!
//! Everything at this boundary fails with [`FetchError`](error::FetchError):
//!
//! - `Network` - connectivity problems, timeouts, exhausted retries
//! - `Protocol` - the service answered with a non-success status
//! - `Decode` - a success response whose body did not match the schema
//!
//! All three are transient from the consumer's point of view; a later retry
//! of the same request is always legal.
//!
//! ## Thread Safety
//!
//! Both traits require `Send + Sync` so implementations can be shared as
//! `Arc<dyn ...>` across async tasks.

pub mod error;
pub mod http;
pub mod model;
pub mod provider;

pub use error::{FetchError, Result};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use model::Repo;
pub use provider::{SearchPage, SearchProvider};
