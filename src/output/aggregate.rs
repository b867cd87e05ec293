//! Aggregation of task outcomes
//!
//! Each task writes its outcome into the slot at its input position exactly
//! once. The aggregate text is joined serially after the last task is
//! recorded, so it follows input order regardless of completion order.

use crate::output::stats::JobStatistics;
use crate::state::{CrawlTask, TaskOutcome};
use crate::FetchError;
use std::time::Duration;

/// Outcome of one task as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// The task's URL
    pub url: String,

    /// Fetch attempts made
    pub attempts: u32,

    /// Terminal outcome
    pub outcome: TaskOutcome,
}

/// Final result of a crawl job
#[derive(Debug, Clone)]
pub struct JobResult {
    content: String,
    reports: Vec<TaskReport>,
    elapsed: Duration,
}

impl JobResult {
    /// The concatenated fragments of all successful tasks, in input order
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consumes the result, returning the aggregate text
    pub fn into_content(self) -> String {
        self.content
    }

    /// Per-task reports, in input order
    pub fn reports(&self) -> &[TaskReport] {
        &self.reports
    }

    /// Wall-clock duration of the job
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Summarizes the job
    pub fn statistics(&self) -> JobStatistics {
        JobStatistics::from_reports(&self.reports, self.elapsed)
    }
}

/// Collects task outcomes for one job
///
/// Only the dispatcher owns the aggregator; workers hand their outcome back
/// through their join handle instead of sharing it.
#[derive(Debug)]
pub struct Aggregator {
    urls: Vec<String>,
    slots: Vec<Option<(u32, TaskOutcome)>>,
}

impl Aggregator {
    /// Creates an aggregator with one empty slot per task
    pub fn new(tasks: &[CrawlTask]) -> Self {
        let mut urls = vec![String::new(); tasks.len()];
        for task in tasks {
            if let Some(slot) = urls.get_mut(task.index) {
                *slot = task.url.clone();
            }
        }

        Self {
            urls,
            slots: vec![None; tasks.len()],
        }
    }

    /// Records a task's terminal outcome
    ///
    /// A slot is written once; a second outcome for the same index is ignored.
    pub fn record(&mut self, task: &CrawlTask, outcome: TaskOutcome) {
        match self.slots.get_mut(task.index) {
            Some(slot) => {
                if slot.is_some() {
                    tracing::warn!("Ignoring duplicate outcome for task {}", task.index);
                } else {
                    *slot = Some((task.attempts_used, outcome));
                }
            }
            None => tracing::warn!("Ignoring outcome for unknown task {}", task.index),
        }
    }

    /// Number of tasks with a recorded outcome
    pub fn completed(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Finalizes the job result
    ///
    /// Slots that never received an outcome count as aborted failures.
    pub fn finish(self, elapsed: Duration) -> JobResult {
        let reports: Vec<TaskReport> = self
            .urls
            .into_iter()
            .zip(self.slots)
            .map(|(url, slot)| match slot {
                Some((attempts, outcome)) => TaskReport {
                    url,
                    attempts,
                    outcome,
                },
                None => TaskReport {
                    outcome: TaskOutcome::Failed(FetchError::Aborted { url: url.clone() }),
                    url,
                    attempts: 0,
                },
            })
            .collect();

        let content = reports
            .iter()
            .filter_map(|report| report.outcome.fragment())
            .collect::<String>();

        JobResult {
            content,
            reports,
            elapsed,
        }
    }
}
