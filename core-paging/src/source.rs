//! Query-bound paging source over a remote search provider

use crate::config::PagingConfig;
use crate::load::{LoadParams, LoadedPage};
use search_traits::{FetchError, SearchProvider};
use std::sync::Arc;
use tracing::debug;

/// Loads pages of one query from a [`SearchProvider`] and derives the
/// continuation keys for each loaded page.
///
/// A source holds no mutable state: a failed load leaves nothing behind,
/// so the same request can simply be retried. Key *resolution* (which
/// boundary token to continue from) belongs to the caller; the source
/// only interprets the token it is handed.
pub struct RepoPagingSource {
    provider: Arc<dyn SearchProvider>,
    query: String,
    config: PagingConfig,
}

impl RepoPagingSource {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        query: impl Into<String>,
        config: PagingConfig,
    ) -> Self {
        Self {
            provider,
            query: query.into(),
            config,
        }
    }

    /// The query this source is bound to
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn config(&self) -> PagingConfig {
        self.config
    }

    /// Fetch the page addressed by `params`.
    ///
    /// An absent key falls back to the configured starting page. On
    /// success the page's keys are derived positionally: the previous
    /// token is one less than the fetched page (absent at the starting
    /// boundary) and the next token is one more (absent when the service
    /// returned zero items).
    pub async fn load(&self, params: &LoadParams) -> Result<LoadedPage, FetchError> {
        let page = params.key.unwrap_or(self.config.starting_page);

        debug!(
            query = %self.query,
            page,
            load_size = params.load_size,
            "Loading page from search provider"
        );

        let fetched = self
            .provider
            .search_repos(&self.query, page, params.load_size)
            .await?;

        let prev_key = if page > self.config.starting_page {
            Some(page - 1)
        } else {
            None
        };
        let next_key = if fetched.repos.is_empty() {
            None
        } else {
            Some(page + 1)
        };

        debug!(
            page,
            items = fetched.repos.len(),
            total_count = fetched.total_count,
            ?prev_key,
            ?next_key,
            "Page loaded"
        );

        Ok(LoadedPage {
            repos: fetched.repos,
            prev_key,
            next_key,
        })
    }
}
