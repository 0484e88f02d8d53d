//! HTTP Transport Seam
//!
//! The narrow request/response vocabulary provider crates are written
//! against, so the transport can be swapped per platform or scripted in
//! tests.

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{FetchError, Result};

/// Request methods providers are expected to issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// A request described independently of any concrete transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            timeout: None,
        }
    }

    /// Shorthand for the common case at this boundary
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Set a header, replacing any previous value under the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach an `Authorization: Bearer` header.
    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        let value = format!("Bearer {}", token.into());
        self.header("Authorization", value)
    }

    /// Per-request deadline, overriding whatever the transport defaults to.
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }
}

/// A response with the body already read to completion.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    /// Decode the body as JSON.
    pub fn json<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(&self.body)
            .map_err(|e| FetchError::Decode(format!("JSON decode failed: {}", e)))
    }

    /// The body as UTF-8 text.
    pub fn text(&self) -> Result<String> {
        let text = std::str::from_utf8(&self.body)
            .map_err(|e| FetchError::Decode(format!("Body is not UTF-8: {}", e)))?;
        Ok(text.to_owned())
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    /// True for 4xx statuses.
    pub fn is_client_error(&self) -> bool {
        matches!(self.status, 400..=499)
    }

    /// True for 5xx statuses.
    pub fn is_server_error(&self) -> bool {
        matches!(self.status, 500..=599)
    }
}

/// Backoff schedule for requests that fail with a transient error.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total tries, counting the first one.
    pub max_attempts: u32,
    /// Delay after the first failed try.
    pub base_delay: Duration,
    /// Ceiling the delay never rises above.
    pub max_delay: Duration,
    /// Double the delay on every retry instead of holding it fixed.
    pub use_exponential_backoff: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            use_exponential_backoff: true,
        }
    }
}

/// Transport the provider stack issues its requests through.
///
/// Implementations are expected to handle connection pooling, TLS and
/// transparent retry of transient failures (429, 5xx, transport errors).
/// A response with a non-success status is still `Ok`: classifying it is
/// the caller's job, since only the caller knows the service's error
/// vocabulary.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a request with the transport's default retry behavior.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] if the request could not produce a
    /// response at all: connection failure, timeout, retries exhausted.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Issue a request under a caller-chosen retry policy.
    async fn execute_with_retry(
        &self,
        request: HttpRequest,
        policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        // Transports that implement backoff override this; the default
        // ignores the policy and issues the request once.
        let _ = policy;
        self.execute(request).await
    }
}
