//! Integration tests for the assembled search core
//!
//! These tests run the whole stack below the HTTP transport: the facade,
//! the GitHub provider, the sync session and a real SQLite-backed cache.
//! Only the `HttpClient` seam is scripted, so request URLs, JSON decoding,
//! error classification and cache writes are all exercised together.

use async_trait::async_trait;
use core_paging::PagingConfig;
use core_runtime::config::CoreConfig;
use core_runtime::search::SearchCore;
use core_store::{DatabaseConfig, PageRequest};
use core_sync::{SyncError, SyncOutcome};
use provider_github::GithubSearchProvider;
use search_traits::{FetchError, HttpClient, HttpRequest, HttpResponse};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Implementations
// ============================================================================

/// HTTP client returning scripted responses and recording every request.
struct ScriptedHttpClient {
    responses: Mutex<VecDeque<search_traits::Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn push(&self, response: search_traits::Result<HttpResponse>) {
        self.responses.lock().unwrap().push_back(response);
    }

    fn request_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn execute(&self, request: HttpRequest) -> search_traits::Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Network("no scripted response".to_string())))
    }
}

// ============================================================================
// Test Utilities
// ============================================================================

fn repo_item(id: i64, name: &str, stars: u32) -> String {
    format!(
        r#"{{"id":{},"name":"{}","full_name":"arcade/{}",
            "description":"Arcade classic","html_url":"https://github.com/arcade/{}",
            "stargazers_count":{},"forks_count":12,"language":"JavaScript"}}"#,
        id, name, name, name, stars
    )
}

fn search_body(total: u64, items: &[String]) -> String {
    format!(
        r#"{{"total_count":{},"incomplete_results":false,"items":[{}]}}"#,
        total,
        items.join(",")
    )
}

fn ok_response(body: String) -> HttpResponse {
    HttpResponse {
        status: 200,
        headers: HashMap::new(),
        body: body.into(),
    }
}

fn error_response(status: u16, message: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: format!(r#"{{"message":"{}"}}"#, message).into(),
    }
}

async fn core_over(http: Arc<ScriptedHttpClient>, page_size: u32) -> SearchCore {
    let provider = GithubSearchProvider::new(http).with_base_url("https://github.test");

    let config = CoreConfig::builder()
        .database(DatabaseConfig::in_memory().max_connections(1))
        .paging(PagingConfig::default().page_size(page_size))
        .provider(Arc::new(provider))
        .build()
        .unwrap();

    SearchCore::new(config).await.unwrap()
}

async fn cached_names(session: &core_sync::SearchSession) -> Vec<String> {
    let page = session.snapshot(PageRequest::new(0, 50)).await.unwrap();
    page.items.into_iter().map(|repo| repo.name).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_refresh_then_append_until_boundary() {
    let http = ScriptedHttpClient::new();
    http.push(Ok(ok_response(search_body(
        3,
        &[
            repo_item(1, "tetris", 6728),
            repo_item(2, "react-tetris", 4200),
        ],
    ))));
    http.push(Ok(ok_response(search_body(
        3,
        &[repo_item(3, "tetris-tutorial", 900)],
    ))));
    http.push(Ok(ok_response(search_body(3, &[]))));

    let core = core_over(http.clone(), 2).await;
    let session = core.search("tetris").await;

    let outcome = session.refresh(None).await.unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::Success {
            end_of_pagination_reached: false
        }
    );

    let outcome = session.append().await.unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::Success {
            end_of_pagination_reached: false
        }
    );

    // Page 3 comes back empty: the forward boundary is reached and latched.
    let outcome = session.append().await.unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::Success {
            end_of_pagination_reached: true
        }
    );
    let outcome = session.append().await.unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::Success {
            end_of_pagination_reached: true
        }
    );

    // Three fetches total; the latched append never hit the network.
    let urls = http.request_urls();
    assert_eq!(urls.len(), 3);
    assert!(urls[0].contains("page=1"));
    assert!(urls[1].contains("page=2"));
    assert!(urls[2].contains("page=3"));
    assert!(urls[0].contains("per_page=2"));

    // Cache holds the union in stars-descending order.
    assert_eq!(
        cached_names(&session).await,
        vec!["tetris", "react-tetris", "tetris-tutorial"]
    );
}

#[tokio::test]
async fn test_query_switch_replaces_cache_and_cancels_old_session() {
    let http = ScriptedHttpClient::new();
    http.push(Ok(ok_response(search_body(
        2,
        &[
            repo_item(1, "tetris", 6728),
            repo_item(2, "react-tetris", 4200),
        ],
    ))));
    http.push(Ok(ok_response(search_body(
        1,
        &[repo_item(7, "pacman-js", 1500)],
    ))));

    let core = core_over(http.clone(), 2).await;

    let old = core.search("tetris").await;
    old.refresh(None).await.unwrap();
    assert_eq!(cached_names(&old).await, vec!["tetris", "react-tetris"]);

    let new = core.search("pacman").await;
    assert!(old.is_cancelled());
    new.refresh(None).await.unwrap();

    // The clearing refresh of the new session wiped the old query's rows.
    assert_eq!(cached_names(&new).await, vec!["pacman-js"]);
    let old_page = old.snapshot(PageRequest::new(0, 50)).await.unwrap();
    assert!(old_page.items.is_empty());

    // The dead session refuses further loads.
    let err = old.append().await.err().unwrap();
    assert!(matches!(err, SyncError::Cancelled));
}

#[tokio::test]
async fn test_rate_limit_error_leaves_cache_intact_and_token_reusable() {
    let http = ScriptedHttpClient::new();
    http.push(Ok(ok_response(search_body(
        3,
        &[
            repo_item(1, "tetris", 6728),
            repo_item(2, "react-tetris", 4200),
        ],
    ))));
    http.push(Ok(error_response(403, "API rate limit exceeded")));
    http.push(Ok(ok_response(search_body(
        3,
        &[repo_item(3, "tetris-tutorial", 900)],
    ))));

    let core = core_over(http.clone(), 2).await;
    let session = core.search("tetris").await;
    session.refresh(None).await.unwrap();

    let err = session.append().await.err().unwrap();
    assert!(err.is_recoverable());
    match err {
        SyncError::Fetch(FetchError::Protocol { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "API rate limit exceeded");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // Nothing was committed for the failed page.
    assert_eq!(cached_names(&session).await, vec!["tetris", "react-tetris"]);

    // The retry resolves the same token and succeeds.
    let outcome = session.append().await.unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::Success {
            end_of_pagination_reached: false
        }
    );

    let urls = http.request_urls();
    assert_eq!(urls.len(), 3);
    assert!(urls[1].contains("page=2"));
    assert!(urls[2].contains("page=2"));
    assert_eq!(
        cached_names(&session).await,
        vec!["tetris", "react-tetris", "tetris-tutorial"]
    );
}
