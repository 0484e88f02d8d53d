//! Remote search provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::model::Repo;

/// One page of search results as the remote service reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    /// Items in service ranking order
    pub repos: Vec<Repo>,
    /// Total matches across all pages, as claimed by the service
    pub total_count: u64,
}

/// Remote repository search.
///
/// A fetch has no side effects; callers own all caching. An empty `repos`
/// on success is a definitive "no results at this page", not a transient
/// condition, which is what end-of-pagination detection rests on.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Fetch one page of results for `query`.
    ///
    /// `page` is 1-based; `per_page` is the maximum number of items the
    /// service should return.
    async fn search_repos(&self, query: &str, page: u32, per_page: u32) -> Result<SearchPage>;
}
