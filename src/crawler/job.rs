//! Crawl job construction

use crate::config::{validate_job_options, JobOptions};
use crate::state::CrawlTask;
use crate::GatherError;

/// A batch of URLs submitted together, with the options they share
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlJob {
    urls: Vec<String>,
    options: JobOptions,
}

impl CrawlJob {
    /// Creates a job from a sequence of URLs
    ///
    /// Entries are trimmed and blank ones dropped. Duplicates are kept and
    /// crawled independently.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlJob)` - At least one URL remained and the options are valid
    /// * `Err(GatherError::EmptyJob)` - No URL remained
    /// * `Err(GatherError::Config)` - Options out of range
    pub fn new<I, S>(urls: I, options: JobOptions) -> Result<Self, GatherError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        validate_job_options(&options)?;

        let urls: Vec<String> = urls
            .into_iter()
            .map(|url| url.as_ref().trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();

        if urls.is_empty() {
            return Err(GatherError::EmptyJob);
        }

        Ok(Self { urls, options })
    }

    /// Creates a job from a newline-separated URL list
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_gather::{CrawlJob, JobOptions};
    ///
    /// let job = CrawlJob::from_url_list("http://a.test\n\n  http://b.test  \n", JobOptions::default()).unwrap();
    /// assert_eq!(job.urls(), ["http://a.test", "http://b.test"]);
    /// ```
    pub fn from_url_list(text: &str, options: JobOptions) -> Result<Self, GatherError> {
        Self::new(text.split('\n'), options)
    }

    /// The URLs to crawl, in input order
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// The options shared by every task
    pub fn options(&self) -> &JobOptions {
        &self.options
    }

    /// Number of tasks the job will dispatch
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Always false for a constructed job
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Splits the job into one task per URL
    pub fn into_parts(self) -> (Vec<CrawlTask>, JobOptions) {
        let tasks = self
            .urls
            .into_iter()
            .enumerate()
            .map(|(index, url)| CrawlTask::new(index, url))
            .collect();
        (tasks, self.options)
    }
}
