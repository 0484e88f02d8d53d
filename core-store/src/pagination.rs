//! Pagination helper types for store reads
//!
//! These describe windows over the *local* cache and are 0-indexed,
//! unlike the 1-based remote page tokens carried in `remote_keys`.

use serde::{Deserialize, Serialize};

/// A window request over the cached result set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Window number (0-indexed)
    pub page: u32,
    /// Number of items per window
    pub page_size: u32,
}

impl PageRequest {
    /// Create a new page request
    ///
    /// # Examples
    ///
    /// ```
    /// use core_store::PageRequest;
    ///
    /// let request = PageRequest::new(2, 20);
    /// assert_eq!(request.offset(), 40);
    /// ```
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// SQL OFFSET value, ready to bind
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.page_size)
    }

    /// SQL LIMIT value, ready to bind
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: 50,
        }
    }
}

/// One window of results plus totals for the whole match set
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in the current window
    pub items: Vec<T>,
    /// Total number of matching items across all windows
    pub total: u64,
    /// Current window number
    pub page: u32,
    /// Total number of windows
    pub total_pages: u32,
    /// Number of items per window
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Assemble a page from fetched items and the total match count
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let total_pages = match request.page_size {
            0 => 0,
            size => total.div_ceil(u64::from(size)) as u32,
        };

        Self {
            items,
            total,
            page: request.page,
            total_pages,
            page_size: request.page_size,
        }
    }

    /// Check if there are more windows after the current one
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    /// Check if there are windows before the current one
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// Map the items to a different type, keeping the window metadata
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            total_pages: self.total_pages,
            page_size: self.page_size,
        }
    }
}
