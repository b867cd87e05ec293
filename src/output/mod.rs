//! Output module for collecting task outcomes into the job result
//!
//! This module handles:
//! - Per-task result slots indexed by input position
//! - Joining successful fragments in input order once every task is terminal
//! - Job statistics and their report

mod aggregate;
pub mod stats;

pub use aggregate::{Aggregator, JobResult, TaskReport};
pub use stats::{print_statistics, JobStatistics};
