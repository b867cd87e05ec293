//! Crawler module for batch page fetching
//!
//! This module contains the core crawling logic, including:
//! - Job construction from a URL list
//! - HTTP fetching with timeout and retry logic
//! - Task scheduling under a concurrency and start-rate limit
//! - Overall job coordination

mod coordinator;
mod fetcher;
mod job;
mod scheduler;

pub use coordinator::{run_task, Dispatcher};
pub use fetcher::{build_http_client, fetch_with_retry, HttpSource, PageSource};
pub use job::CrawlJob;
pub use scheduler::{ScheduledTask, Scheduler};

use crate::config::Config;
use crate::output::JobResult;
use crate::GatherError;
use std::sync::Arc;

/// Maximum number of tasks in flight for a job
pub const MAX_CONNECTIONS: usize = 10;

/// Runs a complete crawl job over HTTP
///
/// This is the main entry point for running a job. It will:
/// 1. Build the HTTP client from the user agent configuration
/// 2. Dispatch one task per URL under the connection and rate limits
/// 3. Fetch, sanitize and extract every page
/// 4. Join the fragments in input order
///
/// # Arguments
///
/// * `job` - The URLs and their options
/// * `config` - The crawler configuration (user agent)
///
/// # Returns
///
/// * `Ok(JobResult)` - Every task reached a terminal outcome
/// * `Err(GatherError)` - The HTTP client could not be built
pub async fn gather(job: CrawlJob, config: &Config) -> Result<JobResult, GatherError> {
    let source = HttpSource::from_config(&config.user_agent)?;
    let dispatcher = Dispatcher::new(Arc::new(source));
    Ok(dispatcher.run(job).await)
}
