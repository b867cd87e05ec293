//! Task state definitions for tracking a single URL through the pipeline

use crate::FetchError;
use std::fmt;

/// One URL's fetch-sanitize-extract unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// Position of the URL in the job input, used for result placement
    pub index: usize,

    /// The URL to fetch
    pub url: String,

    /// Number of fetch attempts made so far
    pub attempts_used: u32,
}

impl CrawlTask {
    /// Creates a task that has not been attempted yet
    pub fn new(index: usize, url: impl Into<String>) -> Self {
        Self {
            index,
            url: url.into(),
            attempts_used: 0,
        }
    }

    /// Records one more attempt and returns the new count
    pub fn record_attempt(&mut self) -> u32 {
        self.attempts_used += 1;
        self.attempts_used
    }

    /// Returns true once the task has used up its attempts
    ///
    /// A task gets the first attempt plus `retry_limit` retries.
    pub fn is_exhausted(&self, retry_limit: u32) -> bool {
        self.attempts_used > retry_limit
    }
}

/// Terminal outcome of a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Page was fetched and a (possibly empty) fragment extracted
    Success(String),

    /// Every attempt failed; carries the last error
    Failed(FetchError),
}

impl TaskOutcome {
    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the extracted fragment of a successful task
    pub fn fragment(&self) -> Option<&str> {
        match self {
            Self::Success(text) => Some(text),
            Self::Failed(_) => None,
        }
    }

    /// Returns the last error of a failed task
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Success(_) => None,
            Self::Failed(error) => Some(error),
        }
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(text) => write!(f, "success ({} chars)", text.chars().count()),
            Self::Failed(error) => write!(f, "failed: {}", error),
        }
    }
}
