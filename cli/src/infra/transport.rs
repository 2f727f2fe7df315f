//! Authenticated HTTP transport to the Twitter API with rate-limit handling.
//!
//! Every registry call goes through [`RateLimitedTransport::request`]. A 429
//! answer blocks until the instant named by the `x-rate-limit-reset` header
//! and replays the identical request; resets are authoritative, so there is
//! no jitter, no backoff growth and no retry cap.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Header carrying the rate-limit window end, in seconds since epoch.
pub const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";

/// Default timeout of a single HTTP exchange.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to Twitter failed")]
    Http(#[from] reqwest::Error),

    #[error("Twitter returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("rate limited by Twitter without a valid x-rate-limit-reset header")]
    InvalidResetHeader,
}

/// Time to wait for a rate-limit window ending at `reset_epoch_secs`,
/// zero when it already ended.
#[must_use]
pub fn rate_limit_wait(reset_epoch_secs: i64, now_epoch_millis: i64) -> Duration {
    let wait_ms = reset_epoch_secs
        .saturating_mul(1000)
        .saturating_sub(now_epoch_millis);
    Duration::from_millis(u64::try_from(wait_ms).unwrap_or(0))
}

/// Bearer-authenticated client that absorbs 429 answers.
#[derive(Debug, Clone)]
pub struct RateLimitedTransport {
    client: reqwest::Client,
    token: String,
}

impl RateLimitedTransport {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(concat!("twitter-compose/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            token: token.into(),
        })
    }

    /// Send a request and return the decoded JSON body of the 2xx answer.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Status`] on any non-2xx, non-429 status,
    /// [`TransportError::InvalidResetHeader`] if a 429 cannot be scheduled,
    /// and [`TransportError::Http`] on network or decoding failure.
    pub async fn request(
        &self,
        method: Method,
        url: &Url,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        loop {
            let mut builder = self
                .client
                .request(method.clone(), url.clone())
                .bearer_auth(&self.token)
                .query(query);
            if let Some(body) = body {
                builder = builder.json(body);
            }
            let response = builder.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let reset = response
                    .headers()
                    .get(RATE_LIMIT_RESET_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<i64>().ok())
                    .ok_or(TransportError::InvalidResetHeader)?;
                let wait = rate_limit_wait(reset, chrono::Utc::now().timestamp_millis());
                tracing::info!(
                    wait_secs = wait.as_secs_f64(),
                    "Too many requests to Twitter, waiting for rate limit"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::info!(%status, payload = %body, "Received error from Twitter");
                return Err(TransportError::Status { status, body });
            }

            return Ok(response.json::<Value>().await?);
        }
    }
}
