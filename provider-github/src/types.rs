//! GitHub search API response types
//!
//! Data structures for deserializing repository search responses.

use search_traits::Repo;
use serde::Deserialize;

/// GitHub API search/repositories response envelope
///
/// See: https://docs.github.com/rest/search/search#search-repositories
#[derive(Debug, Deserialize)]
pub struct RepoSearchResponse {
    /// Total matches across all pages
    pub total_count: u64,

    /// Whether the search timed out server-side and returned a partial set
    #[serde(default)]
    pub incomplete_results: bool,

    /// Matching repositories for the requested page
    pub items: Vec<Repo>,
}

/// Error body GitHub returns for non-success statuses
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}
