//! Reqwest-backed implementation of the `HttpClient` seam

use async_trait::async_trait;
use reqwest::Client;
use search_traits::{
    FetchError, HttpClient, HttpMethod, HttpRequest, HttpResponse, Result, RetryPolicy,
};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// HTTP client over a pooled reqwest `Client`.
///
/// Retries 429, 5xx and transport failures with exponential backoff up to
/// the policy's attempt budget. The final response comes back as `Ok` even
/// when non-success, so the provider can classify it against the service's
/// own error body; `Err(Network)` means no response was produced at all.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Client with the default 30 second request timeout
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Client with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent("repo-search-core/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    /// Wrap an externally configured reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// One send attempt, converted to the boundary response type.
    ///
    /// Reads the body to completion even for statuses the retry loop will
    /// throw away, so the connection returns to the pool cleanly.
    async fn attempt(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.execute_with_retry(request, RetryPolicy::default())
            .await
    }

    async fn execute_with_retry(
        &self,
        request: HttpRequest,
        policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        let mut last_error = None;

        for attempt in 1..=policy.max_attempts {
            debug!(
                attempt,
                max_attempts = policy.max_attempts,
                url = %request.url,
                "Sending HTTP request"
            );

            match self.attempt(&request).await {
                Ok(response) if retryable(&response) && attempt < policy.max_attempts => {
                    warn!(status = response.status, attempt, "Retryable HTTP status");
                }
                Ok(response) => return Ok(response),
                Err(e) => {
                    warn!(error = %e, attempt, "HTTP request failed");
                    last_error = Some(e);
                }
            }

            if attempt < policy.max_attempts {
                let delay = backoff_delay(&policy, attempt);
                debug!(delay_ms = delay.as_millis(), "Retrying after delay");
                sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| FetchError::Network("Retry budget exhausted".to_string())))
    }
}

fn transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Network("Request timed out".to_string())
    } else if e.is_connect() {
        FetchError::Network(format!("Connection failed: {}", e))
    } else {
        FetchError::Network(e.to_string())
    }
}

fn retryable(response: &HttpResponse) -> bool {
    response.status == 429 || response.is_server_error()
}

fn backoff_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    if policy.use_exponential_backoff {
        (policy.base_delay * 2u32.pow(attempt - 1)).min(policy.max_delay)
    } else {
        policy.base_delay
    }
}
