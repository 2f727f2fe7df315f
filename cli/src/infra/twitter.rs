//! Twitter API v2 adapter for the rule registry and tweet counts.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::application::ports::{RuleRegistry, TweetCountSource};
use crate::domain::Rule;
use crate::infra::transport::RateLimitedTransport;

/// Public API root.
pub const DEFAULT_API_URL: &str = "https://api.twitter.com";

const RULES_PATH: &str = "2/tweets/search/stream/rules";
const COUNTS_PATH: &str = "2/tweets/counts/recent";

#[derive(Debug, Deserialize)]
struct RulesResponse {
    #[serde(default)]
    data: Vec<Rule>,
}

#[derive(Debug, Deserialize)]
struct PostResponse {
    #[serde(default)]
    errors: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct CountsResponse {
    #[serde(default)]
    data: Vec<DailyCount>,
}

#[derive(Debug, Deserialize)]
struct DailyCount {
    tweet_count: u64,
}

/// Filtered-stream rules and recent counts over [`RateLimitedTransport`].
#[derive(Debug, Clone)]
pub struct TwitterRuleRegistry {
    transport: RateLimitedTransport,
    base_url: Url,
}

impl TwitterRuleRegistry {
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn new(transport: RateLimitedTransport, base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("invalid API URL '{base_url}'"))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            transport,
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid endpoint '{path}'"))
    }
}

impl RuleRegistry for TwitterRuleRegistry {
    async fn fetch_rules(&self) -> Result<BTreeSet<Rule>> {
        let url = self.endpoint(RULES_PATH)?;
        let body = self
            .transport
            .request(Method::GET, &url, &[], None)
            .await
            .context("fetching stream rules")?;
        let parsed: RulesResponse =
            serde_json::from_value(body).context("unexpected stream rules response")?;
        tracing::debug!(count = parsed.data.len(), "fetched stream rules");
        Ok(parsed.data.into_iter().collect())
    }

    async fn post_rules(&self, body: &Value, dry_run: bool) -> Result<Vec<Value>> {
        let url = self.endpoint(RULES_PATH)?;
        let dry_run = if dry_run { "true" } else { "false" };
        let response = self
            .transport
            .request(Method::POST, &url, &[("dry_run", dry_run)], Some(body))
            .await
            .context("updating stream rules")?;
        let parsed: PostResponse =
            serde_json::from_value(response).context("unexpected stream rules response")?;
        Ok(parsed.errors)
    }
}

impl TweetCountSource for TwitterRuleRegistry {
    async fn daily_counts(&self, query: &str) -> Result<Vec<u64>> {
        let url = self.endpoint(COUNTS_PATH)?;
        let body = self
            .transport
            .request(
                Method::GET,
                &url,
                &[("query", query), ("granularity", "day")],
                None,
            )
            .await?;
        let parsed: CountsResponse =
            serde_json::from_value(body).context("unexpected tweet counts response")?;
        Ok(parsed.data.into_iter().map(|d| d.tweet_count).collect())
    }
}
