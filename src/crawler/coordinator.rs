//! Crawl dispatcher - main job orchestration logic
//!
//! This module fans a job out into tasks and joins them back:
//! - Pulling tasks from the scheduler under the slot and rate limits
//! - Running fetch, sanitize and extract for each task on its own worker
//! - Waiting for every task to reach a terminal outcome
//! - Handing outcomes to the aggregator in input-position slots

use crate::config::JobOptions;
use crate::content::process_page;
use crate::crawler::fetcher::{fetch_with_retry, PageSource};
use crate::crawler::job::CrawlJob;
use crate::crawler::scheduler::{ScheduledTask, Scheduler};
use crate::crawler::MAX_CONNECTIONS;
use crate::output::{Aggregator, JobResult};
use crate::state::{CrawlTask, TaskOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Runs crawl jobs against a page source
pub struct Dispatcher {
    source: Arc<dyn PageSource>,
    max_connections: usize,
}

impl Dispatcher {
    /// Creates a dispatcher with the fixed connection limit
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self {
            source,
            max_connections: MAX_CONNECTIONS,
        }
    }

    /// Overrides the connection limit
    #[cfg(test)]
    pub(crate) fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Runs a job until every task is terminal
    ///
    /// Individual task failures never fail the job; they are left out of the
    /// aggregate text and reported per task.
    pub async fn run(&self, job: CrawlJob) -> JobResult {
        let start_time = Instant::now();
        let (tasks, options) = job.into_parts();
        let options = Arc::new(options);

        tracing::info!(
            "Starting job: {} URLs, {} connections, rate limit {}ms, timeout {}ms, {} retries",
            tasks.len(),
            self.max_connections,
            options.rate_limit_ms,
            options.timeout_ms,
            options.retry_limit
        );

        let mut aggregator = Aggregator::new(&tasks);
        let mut scheduler = Scheduler::new(
            self.max_connections,
            Duration::from_millis(options.rate_limit_ms),
            tasks,
        );
        let mut workers = JoinSet::new();

        while let Some(scheduled) = scheduler.next_task().await {
            let ScheduledTask {
                task,
                _permit: permit,
                ..
            } = scheduled;
            let source = Arc::clone(&self.source);
            let options = Arc::clone(&options);

            workers.spawn(async move {
                let result = run_task(source.as_ref(), task, &options).await;
                drop(permit);
                result
            });
        }

        // Fan-in barrier: every task reports back before the result is built
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((task, outcome)) => aggregator.record(&task, outcome),
                Err(e) => tracing::error!("Crawl worker terminated abnormally: {}", e),
            }
        }

        let result = aggregator.finish(start_time.elapsed());
        let stats = result.statistics();
        tracing::info!(
            "Job completed: {} succeeded, {} failed in {:?}",
            stats.succeeded,
            stats.failed,
            stats.elapsed
        );

        result
    }
}

/// Runs one task to its terminal outcome
///
/// The parsed document never crosses an await point; it is sanitized and
/// extracted synchronously once the body has arrived.
pub async fn run_task(
    source: &dyn PageSource,
    mut task: CrawlTask,
    options: &JobOptions,
) -> (CrawlTask, TaskOutcome) {
    let outcome = match fetch_with_retry(source, &mut task, options).await {
        Ok(body) => {
            let fragment = process_page(&task.url, &body, &options.selector, options.extract_mode);
            tracing::debug!(
                "Extracted {} chars from {}",
                fragment.chars().count(),
                task.url
            );
            TaskOutcome::Success(fragment)
        }
        Err(error) => TaskOutcome::Failed(error),
    };

    (task, outcome)
}
