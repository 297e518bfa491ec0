//! Rate-limited HTTP client for the scholarly citation API.
//!
//! Wraps a single `reqwest::Client`: one owned value, constructed once,
//! handed a cancellation token so blocked I/O can be aborted instead of
//! merely flagged.

use std::time::Duration;

use citegraph_common::{CitegraphError, Result};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tokio_util::sync::CancellationToken;
use tracing::{instrument, warn};

use crate::ratelimit::RateLimiter;
use crate::retry::retry_with_backoff;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ATTEMPTS: u32 = 5;

pub struct ApiClient {
    http: reqwest::Client,
    limiter: RateLimiter,
    base_url: String,
    api_key: Option<SecretString>,
    cancel: CancellationToken,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<SecretString>,
        requests_per_second: u32,
        window: Duration,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            limiter: RateLimiter::new(requests_per_second as usize, window),
            base_url: base_url.into(),
            api_key,
            cancel,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `path` with a JSON body, returning the parsed JSON body on
    /// success. Retries transient failures per `send_request`'s policy.
    #[instrument(skip(self, body))]
    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        self.send_request(Method::POST, &url, None, Some(body)).await
    }

    /// GET `path` with query params, returning the parsed JSON body.
    #[instrument(skip(self))]
    pub async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        self.send_request(Method::GET, &url, Some(params), None).await
    }

    /// Core send-with-retry loop. One retryable attempt is one pass
    /// through `acquire` → HTTP call → status inspection.
    async fn send_request(
        &self,
        method: Method,
        url: &str,
        params: Option<&[(&str, String)]>,
        json_body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value> {
        retry_with_backoff(MAX_ATTEMPTS, || async {
            if self.cancel.is_cancelled() {
                return Err(CitegraphError::Transient("shutdown requested".into()));
            }

            self.limiter.acquire().await;

            let mut builder = self.http.request(method.clone(), url);
            if let Some(key) = &self.api_key {
                builder = builder.header("x-api-key", key.expose_secret());
            }
            if let Some(p) = params {
                builder = builder.query(p);
            }
            if let Some(b) = json_body {
                builder = builder.json(b);
            }

            let resp = tokio::select! {
                r = builder.send() => r.map_err(CitegraphError::from),
                _ = self.cancel.cancelled() => Err(CitegraphError::Transient("cancelled mid-flight".into())),
            }?;

            let status = resp.status();
            if status.is_success() {
                return resp.json::<serde_json::Value>().await.map_err(CitegraphError::from);
            }

            if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::INTERNAL_SERVER_ERROR {
                if let Some(retry_after) = parse_retry_after(&resp) {
                    warn!(seconds = retry_after, "429/500 with Retry-After, sleeping");
                    tokio::time::sleep(Duration::from_secs(retry_after)).await;
                }
                return Err(CitegraphError::RateLimited(format!("status {status}")));
            }

            let body_text = resp.text().await.unwrap_or_default();
            Err(CitegraphError::ApiStatus { status: status.as_u16(), body: body_text })
        })
        .await
    }
}

fn parse_retry_after(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(parse_retry_after_value)
}

fn parse_retry_after_value(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_retry_after_accepts_integer_header() {
        assert_eq!(parse_retry_after_value("2"), Some(2));
    }

    #[test]
    fn parse_retry_after_rejects_non_integer_header() {
        assert_eq!(parse_retry_after_value("Wed, 21 Oct"), None);
    }
}
