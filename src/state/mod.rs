//! State module for tracking task progress
//!
//! # Components
//!
//! - `CrawlTask`: one URL bound to its position in the job and its attempt counter
//! - `TaskOutcome`: the terminal result of a task (extracted text or the last error)

mod task;

pub use task::{CrawlTask, TaskOutcome};
