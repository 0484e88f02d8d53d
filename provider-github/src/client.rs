//! GitHub search API connector
//!
//! Implements the `SearchProvider` trait for the GitHub REST search API.

use async_trait::async_trait;
use search_traits::{
    FetchError, HttpClient, HttpRequest, Result, RetryPolicy, SearchPage, SearchProvider,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::types::{ApiErrorBody, RepoSearchResponse};

/// GitHub API base URL
const GITHUB_API_BASE: &str = "https://api.github.com";

/// Qualifier appended to every query so matches are restricted to
/// repository name and description
const IN_QUALIFIER: &str = "in:name,description";

/// Media type GitHub recommends for REST API requests
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// GitHub search API connector
///
/// # Features
///
/// - Repository search ordered by stars, 1-based page tokens
/// - Query qualifier restricting matches to name/description
/// - Retry of rate limits and server errors via the injected `HttpClient`
/// - Optional bearer token authentication for higher rate limits
///
/// # Example
///
/// ```ignore
/// use provider_github::GithubSearchProvider;
/// use search_traits::SearchProvider;
///
/// let provider = GithubSearchProvider::new(http_client);
/// let page = provider.search_repos("tetris", 1, 50).await?;
/// ```
pub struct GithubSearchProvider {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// API base URL, overridable for tests and GitHub Enterprise hosts
    base_url: String,

    /// Optional OAuth / PAT bearer token
    access_token: Option<String>,

    /// Retry policy handed to the HTTP client per request
    retry_policy: RetryPolicy,
}

impl GithubSearchProvider {
    /// Create a new connector against the public GitHub API
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: GITHUB_API_BASE.to_string(),
            access_token: None,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Authenticate requests with a bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Override the retry policy used for search requests
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Build the search URL with qualifier, encoding and paging parameters
    fn build_search_url(&self, query: &str, page: u32, per_page: u32) -> String {
        let api_query = format!("{} {}", query.trim(), IN_QUALIFIER);

        format!(
            "{}/search/repositories?sort=stars&q={}&page={}&per_page={}",
            self.base_url,
            urlencoding::encode(&api_query),
            page,
            per_page
        )
    }
}

#[async_trait]
impl SearchProvider for GithubSearchProvider {
    #[instrument(skip(self))]
    async fn search_repos(&self, query: &str, page: u32, per_page: u32) -> Result<SearchPage> {
        debug!("Searching GitHub repositories");

        let url = self.build_search_url(query, page, per_page);

        let mut request = HttpRequest::get(url)
            .header("Accept", GITHUB_ACCEPT)
            .timeout(Duration::from_secs(30));

        if let Some(token) = &self.access_token {
            request = request.bearer_token(token);
        }

        let response = self
            .http_client
            .execute_with_retry(request, self.retry_policy.clone())
            .await?;

        if !response.is_success() {
            // GitHub error bodies carry a human-readable message; fall back
            // to the raw body when the shape is unexpected
            let message = response
                .json::<ApiErrorBody>()
                .map(|body| body.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&response.body).to_string());

            warn!(
                status = response.status,
                %message,
                "GitHub search request failed"
            );

            return Err(FetchError::Protocol {
                status: response.status,
                message,
            });
        }

        let parsed: RepoSearchResponse = response.json()?;

        debug!(
            items = parsed.items.len(),
            total_count = parsed.total_count,
            "Fetched GitHub search page"
        );

        Ok(SearchPage {
            repos: parsed.items,
            total_count: parsed.total_count,
        })
    }
}
