//! HTTP fetcher implementation
//!
//! This module handles all page retrieval for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Single GET attempts behind the [`PageSource`] trait
//! - Per-attempt timeouts and immediate retries
//! - Error classification

use crate::config::{JobOptions, UserAgentConfig};
use crate::state::CrawlTask;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// A source of page bodies, one attempt per call
///
/// Timeouts and retries are layered on top by [`fetch_with_retry`], so an
/// implementation only has to make a single attempt.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the body of `url`
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`PageSource`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Wraps an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the user agent configuration
    pub fn from_config(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| classify_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Builds an HTTP client with proper configuration
///
/// No overall request timeout is set here; each attempt is bounded by the
/// job's timeout in [`fetch_with_retry`].
///
/// # Example
///
/// ```no_run
/// use sumi_gather::config::UserAgentConfig;
/// use sumi_gather::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(url: &str, error: &reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "Connection timeout".to_string()
    } else if error.is_connect() {
        format!("Connection refused: {}", error)
    } else if error.is_redirect() {
        format!("Redirect error: {}", error)
    } else {
        error.to_string()
    };

    FetchError::Network {
        url: url.to_string(),
        message,
    }
}

/// Fetches a task's URL, retrying immediately on failure
///
/// # Retry Logic
///
/// Every failure (network error, non-2xx status, timeout, unreadable body)
/// counts as one attempt. The task is tried once plus `retry_limit` more
/// times with no delay in between; the last error is returned when all
/// attempts fail.
///
/// # Arguments
///
/// * `source` - Where page bodies come from
/// * `task` - The task to fetch; its attempt counter is updated
/// * `options` - Timeout and retry settings of the job
pub async fn fetch_with_retry(
    source: &dyn PageSource,
    task: &mut CrawlTask,
    options: &JobOptions,
) -> Result<String, FetchError> {
    let timeout = Duration::from_millis(options.timeout_ms);
    let max_attempts = options.retry_limit + 1;

    loop {
        let attempt = task.record_attempt();
        tracing::info!("Fetching {} (attempt {}/{})", task.url, attempt, max_attempts);

        let error = match tokio::time::timeout(timeout, source.fetch(&task.url)).await {
            Ok(Ok(body)) => return Ok(body),
            Ok(Err(e)) => e,
            Err(_) => FetchError::Timeout {
                url: task.url.clone(),
                timeout_ms: options.timeout_ms,
            },
        };

        if task.is_exhausted(options.retry_limit) {
            tracing::error!(
                "Giving up on {} after {} attempts: {}",
                task.url,
                attempt,
                error
            );
            return Err(error);
        }

        tracing::warn!("Attempt {} for {} failed: {}", attempt, task.url, error);
    }
}
