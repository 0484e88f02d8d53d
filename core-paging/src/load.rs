//! Load requests and results

use search_traits::Repo;
use std::fmt;

/// Which edge of the cached list a load extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadDirection {
    /// Replace the cache from the anchor position
    Refresh,
    /// Extend before the first cached item
    Prepend,
    /// Extend after the last cached item
    Append,
}

impl fmt::Display for LoadDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadDirection::Refresh => write!(f, "refresh"),
            LoadDirection::Prepend => write!(f, "prepend"),
            LoadDirection::Append => write!(f, "append"),
        }
    }
}

/// Parameters for one source load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadParams {
    /// Resolved 1-based page token. `None` means "start from the
    /// beginning" and falls back to the configured starting page.
    pub key: Option<u32>,
    /// Requested number of items
    pub load_size: u32,
}

impl LoadParams {
    pub fn new(key: Option<u32>, load_size: u32) -> Self {
        Self { key, load_size }
    }
}

/// One successfully loaded page with its continuation keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    /// Items in service ranking order
    pub repos: Vec<Repo>,
    /// Token of the page before this one; `None` at the starting boundary
    pub prev_key: Option<u32>,
    /// Token of the page after this one; `None` when this fetch came back
    /// empty, which is the definitive end of forward pagination
    pub next_key: Option<u32>,
}
