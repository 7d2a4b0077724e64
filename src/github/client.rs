//! Hosting API client
//!
//! Minimal authenticated HTTP client for the hosting API, classifying
//! responses by status code so callers can handle not-found and
//! rate-limited results explicitly.

use crate::Result;
use chrono::{DateTime, Utc};
use core::time::Duration;
use reqwest::header::HeaderMap;

/// Rate limit information from response headers
#[derive(Debug, Clone, Copy)]
pub struct RateLimitInfo {
    pub remaining: usize,
    pub reset_at: DateTime<Utc>,
}

/// Result of a hosting API call
#[derive(Debug)]
pub enum ApiResult {
    /// Request succeeded with a 2xx status
    Success(reqwest::Response),

    /// The requested resource was not found (404)
    NotFound,

    /// Rate limited (403 or 429); header info included when the API sent it
    RateLimited(Option<RateLimitInfo>),

    /// Request failed permanently
    Failed(ohno::AppError),
}

/// Hosting API client
#[derive(Debug, Clone)]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl Client {
    /// Create a new API client with an optional authentication token
    pub fn new(token: Option<&str>, base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};

        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("token {t}"))?;
            auth_val.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth_val);
        }

        let client = reqwest::Client::builder()
            .user_agent("repo-miner/0.1")
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            request_timeout,
        })
    }

    /// Get the base URL for this client
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make an API call with the default request timeout
    pub async fn get(&self, url: &str) -> ApiResult {
        self.get_with_timeout(url, self.request_timeout).await
    }

    /// Make an API call with an explicit timeout (archive downloads need a
    /// longer budget than plain API requests) and classify the result
    pub async fn get_with_timeout(&self, url: &str, timeout: Duration) -> ApiResult {
        let resp = match self.client.get(url).timeout(timeout).send().await {
            Ok(r) => r,
            Err(e) => return ApiResult::Failed(e.into()),
        };

        let status = resp.status();
        if status.is_success() {
            return ApiResult::Success(resp);
        }

        if status.as_u16() == 404 {
            return ApiResult::NotFound;
        }

        if matches!(status.as_u16(), 403 | 429) {
            return ApiResult::RateLimited(extract_rate_limit_from_headers(resp.headers()));
        }

        let body = resp.text().await.unwrap_or_default();
        ApiResult::Failed(ohno::app_err!("request to '{url}' failed with status {status}: {body}"))
    }
}

/// Extract rate limit information from API response headers
fn extract_rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<usize>().ok()?;

    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;

    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

    Some(RateLimitInfo { remaining, reset_at })
}
