//! HTTP client trait and implementations.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::error::FetchError;

use super::rate_limiter::RateLimiter;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default delay between requests to the same host in milliseconds.
pub const DEFAULT_RATE_LIMIT_MS: u64 = 200;

/// Trait for JSON HTTP clients, enabling mockability in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET a URL and decode the body as JSON.
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;

    /// POST a JSON body and decode the response body as JSON.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, FetchError>;
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        (**self).get_json(url).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, FetchError> {
        (**self).post_json(url, body).await
    }
}

/// Configuration for [`JsonClient`].
#[derive(Clone)]
pub struct JsonClientBuilder {
    rate_limit_ms: u64,
    timeout: Duration,
    user_agent: String,
}

impl Default for JsonClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonClientBuilder {
    /// Create a builder from the environment.
    ///
    /// - `DISHLENS_HTTP_TIMEOUT_SECS`: request timeout (default 60)
    /// - `DISHLENS_HTTP_RATE_LIMIT_MS`: per-host spacing, 0 disables (default 200)
    pub fn new() -> Self {
        let timeout_secs = std::env::var("DISHLENS_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let rate_limit_ms = std::env::var("DISHLENS_HTTP_RATE_LIMIT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RATE_LIMIT_MS);

        Self {
            rate_limit_ms,
            timeout: Duration::from_secs(timeout_secs),
            user_agent: format!("dishlens/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the rate limit delay in milliseconds. 0 disables rate limiting.
    pub fn rate_limit_ms(mut self, ms: u64) -> Self {
        self.rate_limit_ms = ms;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn build(self) -> Result<JsonClient, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;

        Ok(JsonClient {
            inner: Arc::new(inner),
            rate_limiter: RateLimiter::new(Duration::from_millis(self.rate_limit_ms)),
        })
    }
}

/// Production JSON client with a timeout and per-host rate limiting.
pub struct JsonClient {
    /// Shared reqwest client for connection pooling.
    inner: Arc<reqwest::Client>,
    rate_limiter: RateLimiter,
}

impl JsonClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        JsonClientBuilder::new().build()
    }

    pub fn builder() -> JsonClientBuilder {
        JsonClientBuilder::new()
    }

    async fn send(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, FetchError> {
        let started = std::time::Instant::now();
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(url = redact(url), status = %status, "network: request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        tracing::debug!(
            url = redact(url),
            status = %status,
            bytes = bytes.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "network: ok"
        );
        serde_json::from_slice(&bytes).map_err(|e| FetchError::InvalidBody(e.to_string()))
    }

    async fn prepare(&self, url: &str) -> Result<reqwest::Url, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if let Some(host) = parsed.host_str() {
            self.rate_limiter.wait(host).await;
        }
        Ok(parsed)
    }
}

/// Drop the query string, which may carry an API key, before logging a URL.
fn redact(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

#[async_trait]
impl HttpClient for JsonClient {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let parsed = self.prepare(url).await?;
        self.send(url, self.inner.get(parsed)).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, FetchError> {
        let parsed = self.prepare(url).await?;
        self.send(url, self.inner.post(parsed).json(body)).await
    }
}

/// Mock response for testing.
#[derive(Clone)]
pub enum MockResponse {
    Json(Value),
    /// Non-2xx answer with a raw body.
    Status(u16, String),
    /// Connection-level failure.
    Error(String),
}

/// A request seen by [`MockClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    /// `None` for GET.
    pub body: Option<Value>,
}

/// Mock HTTP client for testing. Responses are keyed by exact URL.
#[derive(Default)]
pub struct MockClient {
    responses: HashMap<String, MockResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: &str, response: MockResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn with_json(self, url: &str, json: Value) -> Self {
        self.with_response(url, MockResponse::Json(json))
    }

    pub fn with_status(self, url: &str, status: u16, body: &str) -> Self {
        self.with_response(url, MockResponse::Status(status, body.to_string()))
    }

    pub fn with_error(self, url: &str, error: &str) -> Self {
        self.with_response(url, MockResponse::Error(error.to_string()))
    }

    /// Every request made so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn respond(&self, url: &str, body: Option<&Value>) -> Result<Value, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                url: url.to_string(),
                body: body.cloned(),
            });

        match self.responses.get(url) {
            Some(MockResponse::Json(json)) => Ok(json.clone()),
            Some(MockResponse::Status(status, body)) => Err(FetchError::Status {
                status: *status,
                body: body.clone(),
            }),
            Some(MockResponse::Error(e)) => Err(FetchError::InvalidUrl(e.clone())),
            None => Err(FetchError::InvalidUrl(format!(
                "No mock response for URL: {}",
                url
            ))),
        }
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.respond(url, None)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, FetchError> {
        self.respond(url, Some(body))
    }
}
