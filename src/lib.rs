//! Sumi-Gather: a batch page harvester
//!
//! This crate fetches a batch of URLs concurrently, strips scripts, styling and
//! interactive noise from every page, extracts a selected fragment as text and
//! joins the fragments into a single result.

pub mod config;
pub mod content;
pub mod crawler;
pub mod output;
pub mod state;

use thiserror::Error;

/// Job-level error type for Sumi-Gather operations
///
/// Only problems with the job itself end up here. Failures of individual URLs
/// are recorded in the [`output::JobResult`] instead.
#[derive(Debug, Error)]
pub enum GatherError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No URLs to crawl after discarding blank entries")]
    EmptyJob,

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors from a single fetch attempt
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout after {timeout_ms}ms for {url}")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Task for {url} ended before recording an outcome")]
    Aborted { url: String },
}

impl FetchError {
    /// The URL the failed attempt was made against
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url, .. }
            | Self::Network { url, .. }
            | Self::HttpStatus { url, .. }
            | Self::InvalidUrl { url, .. }
            | Self::Body { url, .. }
            | Self::Aborted { url } => url,
        }
    }
}

/// Result type alias for Sumi-Gather operations
pub type Result<T> = std::result::Result<T, GatherError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, ExtractMode, JobOptions};
pub use crawler::{gather, CrawlJob, MAX_CONNECTIONS};
pub use output::JobResult;
pub use state::{CrawlTask, TaskOutcome};
