//! Pagination tuning

use serde::{Deserialize, Serialize};

/// Tuning for one pagination session.
///
/// Carried explicitly by the source and the sync coordinator instead of
/// living in process-wide constants, so two sessions can page a service
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Number of items requested per remote page
    pub page_size: u32,
    /// First page number the remote service accepts. Tokens never go
    /// below this sentinel.
    pub starting_page: u32,
}

impl PagingConfig {
    /// Set the remote page size
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the starting page sentinel
    pub fn starting_page(mut self, starting_page: u32) -> Self {
        self.starting_page = starting_page;
        self
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            starting_page: 1,
        }
    }
}
