//! Statistics for a finished crawl job
//!
//! This module provides functionality for summarizing task reports and
//! displaying them.

use crate::output::TaskReport;
use std::collections::BTreeMap;
use std::time::Duration;

/// Crawl job statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatistics {
    /// Number of tasks dispatched
    pub total: usize,

    /// Tasks that produced a fragment (possibly empty)
    pub succeeded: usize,

    /// Tasks whose every attempt failed
    pub failed: usize,

    /// Successful tasks whose fragment was empty
    pub empty_fragments: usize,

    /// Fetch attempts across all tasks
    pub total_attempts: u64,

    /// Characters in the aggregate text
    pub content_chars: usize,

    /// Failed tasks grouped by error kind
    pub error_summary: BTreeMap<&'static str, usize>,

    /// Wall-clock duration of the job
    pub elapsed: Duration,
}

impl JobStatistics {
    /// Builds statistics from per-task reports
    pub fn from_reports(reports: &[TaskReport], elapsed: Duration) -> Self {
        let mut stats = Self {
            total: reports.len(),
            succeeded: 0,
            failed: 0,
            empty_fragments: 0,
            total_attempts: 0,
            content_chars: 0,
            error_summary: BTreeMap::new(),
            elapsed,
        };

        for report in reports {
            stats.total_attempts += u64::from(report.attempts);

            if let Some(fragment) = report.outcome.fragment() {
                stats.succeeded += 1;
                stats.content_chars += fragment.chars().count();
                if fragment.is_empty() {
                    stats.empty_fragments += 1;
                }
            }

            if let Some(error) = report.outcome.error() {
                stats.failed += 1;
                *stats.error_summary.entry(error_kind(error)).or_insert(0) += 1;
            }
        }

        stats
    }

    /// Percentage of tasks that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.total > 0 {
            (self.succeeded as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Short label for an error variant
fn error_kind(error: &crate::FetchError) -> &'static str {
    use crate::FetchError;

    match error {
        FetchError::Timeout { .. } => "timeout",
        FetchError::Network { .. } => "network",
        FetchError::HttpStatus { .. } => "http-status",
        FetchError::InvalidUrl { .. } => "invalid-url",
        FetchError::Body { .. } => "body",
        FetchError::Aborted { .. } => "aborted",
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is reserved for the aggregate text.
pub fn print_statistics(stats: &JobStatistics, reports: &[TaskReport]) {
    eprintln!("=== Job Statistics ===\n");

    eprintln!("Overview:");
    eprintln!("  Tasks dispatched: {}", stats.total);
    eprintln!("  Succeeded: {}", stats.succeeded);
    eprintln!("  Failed: {}", stats.failed);
    eprintln!("  Empty fragments: {}", stats.empty_fragments);
    eprintln!("  Fetch attempts: {}", stats.total_attempts);
    eprintln!("  Aggregate length: {} chars", stats.content_chars);
    eprintln!("  Elapsed: {:.2?}", stats.elapsed);
    eprintln!();

    if !stats.error_summary.is_empty() {
        eprintln!("Error Summary:");
        for (kind, count) in &stats.error_summary {
            eprintln!("  {}: {}", kind, count);
        }
        eprintln!();

        eprintln!("Failed URLs:");
        for report in reports {
            if let Some(error) = report.outcome.error() {
                eprintln!("  - {} ({} attempts): {}", report.url, report.attempts, error);
            }
        }
        eprintln!();
    }

    eprintln!(
        "Success Rate: {:.1}% ({} / {} tasks)",
        stats.success_rate(),
        stats.succeeded,
        stats.total
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TaskOutcome;
    use crate::FetchError;

    fn report(url: &str, attempts: u32, outcome: TaskOutcome) -> TaskReport {
        TaskReport {
            url: url.to_string(),
            attempts,
            outcome,
        }
    }

    #[test]
    fn test_statistics_from_reports() {
        let reports = vec![
            report("http://a.test", 1, TaskOutcome::Success("Hello".to_string())),
            report("http://b.test", 2, TaskOutcome::Success(String::new())),
            report(
                "http://c.test",
                3,
                TaskOutcome::Failed(FetchError::Timeout {
                    url: "http://c.test".to_string(),
                    timeout_ms: 100,
                }),
            ),
            report(
                "http://d.test",
                3,
                TaskOutcome::Failed(FetchError::HttpStatus {
                    url: "http://d.test".to_string(),
                    status: 500,
                }),
            ),
        ];

        let stats = JobStatistics::from_reports(&reports, Duration::from_secs(2));

        assert_eq!(stats.total, 4);
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.empty_fragments, 1);
        assert_eq!(stats.total_attempts, 9);
        assert_eq!(stats.content_chars, 5);
        assert_eq!(stats.error_summary.get("timeout"), Some(&1));
        assert_eq!(stats.error_summary.get("http-status"), Some(&1));
        assert_eq!(stats.success_rate(), 50.0);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = JobStatistics::from_reports(&[], Duration::ZERO);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.success_rate(), 0.0);
    }
}
