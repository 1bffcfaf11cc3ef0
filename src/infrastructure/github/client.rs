//! GitHub HTTP client with rate-limit backoff.
//!
//! Wraps the two list endpoints the tracker needs and the pagination loop
//! behind them. Requests are issued strictly one at a time.
//!
//! When GitHub answers `403 Forbidden` with a body mentioning the rate
//! limit, the client waits for `Retry-After` seconds (or the configured
//! default) and repeats the same request. Every other failure is returned
//! to the caller immediately.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::domain::errors::{TrackerError, TrackerResult};
use crate::domain::models::{IssueStateFilter, Settings};
use crate::domain::ports::{Sleeper, TokioSleeper};

use super::link;
use super::models::{GitHubIssue, GitHubRepository};

/// Media type requested from the API.
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Body text that distinguishes a rate-limited 403 from a permission error.
const RATE_LIMIT_MARKER: &str = "rate limit";

const CLIENT_USER_AGENT: &str = concat!("org-issues/", env!("CARGO_PKG_VERSION"));

/// How the client reacts to rate-limited responses.
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    /// Delay used when `Retry-After` is missing or unparsable
    pub default_retry_after: Duration,
    /// Consecutive rate-limited responses tolerated per request; `None` retries forever
    pub max_retries: Option<u32>,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            default_retry_after: Duration::from_secs(60),
            max_retries: None,
        }
    }
}

/// Result of a single GET in the pagination loop.
enum PageOutcome<T> {
    /// A page was consumed; `next` is the following page, if any.
    Page { items: Vec<T>, next: Option<String> },
    /// The request must be repeated after `retry_after`.
    RateLimited { retry_after: Duration },
}

/// HTTP client for the GitHub REST API v3.
#[derive(Clone)]
pub struct GitHubClient {
    /// The underlying HTTP client (carries the per-request timeout).
    http: Client,
    /// Personal access token or fine-grained token.
    token: String,
    /// Base API URL without a trailing slash.
    api_url: String,
    per_page: u8,
    issue_state: IssueStateFilter,
    rate_limit: RateLimitPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .field("per_page", &self.per_page)
            .field("issue_state", &self.issue_state)
            .field("rate_limit", &self.rate_limit)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Create a client from validated settings.
    ///
    /// # Returns
    /// * `Err(anyhow::Error)` - Failed to build the HTTP client
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(CLIENT_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            token: settings.token.clone(),
            api_url: settings.api_url.clone(),
            per_page: settings.per_page,
            issue_state: settings.issue_state,
            rate_limit: RateLimitPolicy {
                default_retry_after: settings.default_retry_after,
                max_retries: settings.max_rate_limit_retries,
            },
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replace the sleeper used during rate-limit backoff.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// URL of the first page of an organization's repositories.
    pub fn org_repositories_url(&self, org: &str) -> String {
        format!("{}/orgs/{}/repos?per_page={}", self.api_url, org, self.per_page)
    }

    /// URL of the first page of a repository's issues.
    pub fn repository_issues_url(&self, org: &str, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/issues?state={}&per_page={}",
            self.api_url, org, repo, self.issue_state, self.per_page
        )
    }

    /// List every repository of an organization, archived ones included.
    pub async fn list_org_repositories(&self, org: &str) -> TrackerResult<Vec<GitHubRepository>> {
        self.fetch_all(&self.org_repositories_url(org)).await
    }

    /// List every issue record of a repository.
    ///
    /// Note: GitHub's `/issues` endpoint also returns pull requests.
    /// Callers are responsible for filtering them out via the
    /// `pull_request` field.
    pub async fn list_repository_issues(
        &self,
        org: &str,
        repo: &str,
    ) -> TrackerResult<Vec<GitHubIssue>> {
        self.fetch_all(&self.repository_issues_url(org, repo)).await
    }

    /// Fetch every page starting at `url` and concatenate the items in server order.
    ///
    /// Follows `rel="next"` links until none is returned. A rate-limited
    /// response is never parsed; the same URL is requested again after the
    /// backoff. The cursor is not checked for cycles.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch_all<T: DeserializeOwned>(&self, url: &str) -> TrackerResult<Vec<T>> {
        let mut items = Vec::new();
        let mut cursor = Some(url.to_string());
        let mut pages = 0_u32;
        let mut attempts = 0_u32;

        while let Some(current) = cursor.take() {
            match self.fetch_page::<T>(&current).await? {
                PageOutcome::Page { items: page, next } => {
                    pages += 1;
                    attempts = 0;
                    debug!(url = %current, page = pages, count = page.len(), "fetched page");
                    items.extend(page);
                    cursor = next;
                }
                PageOutcome::RateLimited { retry_after } => {
                    attempts += 1;
                    if self.rate_limit.max_retries.is_some_and(|max| attempts > max) {
                        return Err(TrackerError::RateLimitExhausted {
                            url: current,
                            attempts,
                        });
                    }
                    warn!(
                        url = %current,
                        retry_after_secs = retry_after.as_secs(),
                        attempt = attempts,
                        "Rate limit exceeded, retrying after backoff"
                    );
                    self.sleeper.sleep(retry_after).await;
                    cursor = Some(current);
                }
            }
        }

        Ok(items)
    }

    /// Issue one authorized GET and classify the response.
    async fn fetch_page<T: DeserializeOwned>(&self, url: &str) -> TrackerResult<PageOutcome<T>> {
        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await
            .map_err(|source| TrackerError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();

        if status == StatusCode::FORBIDDEN {
            let retry_after = self.retry_after(resp.headers());
            let body = resp.text().await.map_err(|source| TrackerError::Transport {
                url: url.to_string(),
                source,
            })?;
            if is_rate_limited(&body) {
                return Ok(PageOutcome::RateLimited { retry_after });
            }
            return Err(TrackerError::HttpStatus {
                status,
                url: url.to_string(),
                body,
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TrackerError::HttpStatus {
                status,
                url: url.to_string(),
                body,
            });
        }

        let next = link::relation_url(resp.headers(), link::NEXT);
        let bytes = resp.bytes().await.map_err(|source| TrackerError::Transport {
            url: url.to_string(),
            source,
        })?;
        let items = serde_json::from_slice::<Vec<T>>(&bytes).map_err(|source| {
            TrackerError::Parse {
                url: url.to_string(),
                source,
            }
        })?;

        Ok(PageOutcome::Page { items, next })
    }

    /// Delay requested by the server, falling back to the policy default.
    fn retry_after(&self, headers: &HeaderMap) -> Duration {
        headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map_or(self.rate_limit.default_retry_after, Duration::from_secs)
    }
}

fn is_rate_limited(body: &str) -> bool {
    body.to_lowercase().contains(RATE_LIMIT_MARKER)
}
