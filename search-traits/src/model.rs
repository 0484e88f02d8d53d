//! Repository domain model
//!
//! One type serves as both the wire shape and the cached row shape: the
//! serde renames translate the search API's field names, and the store
//! crate maps the same struct to its table.

use serde::{Deserialize, Serialize};

/// A repository as returned by the search service.
///
/// `id` is assigned by the remote service and is stable across fetches;
/// re-fetching an item replaces the previously cached value wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    #[serde(rename = "html_url")]
    pub url: String,
    /// Ranking value the read order sorts on, descending
    #[serde(rename = "stargazers_count")]
    pub stars: i64,
    #[serde(rename = "forks_count")]
    pub forks: i64,
    pub language: Option<String>,
}
