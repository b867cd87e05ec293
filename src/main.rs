//! Sumi-Gather main entry point
//!
//! This is the command-line interface for the Sumi-Gather batch page harvester.

use anyhow::Context;
use clap::Parser;
use std::io::{Read, Write};
use std::path::PathBuf;
use sumi_gather::config::{load_config_with_hash, validate_job_options, Config};
use sumi_gather::crawler::gather;
use sumi_gather::output::print_statistics;
use sumi_gather::{CrawlJob, ExtractMode};
use tracing_subscriber::EnvFilter;

/// Sumi-Gather: a batch page harvester
///
/// Fetches every URL of a newline-separated list, strips scripts, styling and
/// navigation noise, extracts the selected fragment as text and prints all
/// fragments joined in input order.
#[derive(Parser, Debug)]
#[command(name = "sumi-gather")]
#[command(version)]
#[command(about = "A batch page harvester", long_about = None)]
struct Cli {
    /// File with one URL per line (reads stdin when omitted)
    #[arg(value_name = "URLS")]
    urls: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// CSS selector of the fragment to extract
    #[arg(short, long)]
    selector: Option<String>,

    /// Minimum gap between task starts in milliseconds
    #[arg(long, value_name = "MS")]
    rate_limit: Option<u64>,

    /// Timeout per fetch attempt in milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Retries per URL after the first failed attempt
    #[arg(long, value_name = "N")]
    retry_limit: Option<u32>,

    /// Fragment serialization: text or html
    #[arg(long, value_name = "MODE")]
    extract: Option<ExtractMode>,

    /// Print job statistics to stderr when done
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(&cli)?;
    let url_list = read_url_list(cli.urls.as_ref())?;

    let job = CrawlJob::from_url_list(&url_list, config.crawler.clone())
        .context("Invalid crawl job")?;
    tracing::info!("Crawling {} URLs", job.len());

    let result = match gather(job, &config).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if cli.stats {
        print_statistics(&result.statistics(), result.reports());
    }

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", result.content())?;
    stdout.flush()?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only the aggregate text.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_gather=info,warn"),
            1 => EnvFilter::new("sumi_gather=debug,info"),
            2 => EnvFilter::new("sumi_gather=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, if any, and applies command-line overrides
fn load_configuration(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(selector) = &cli.selector {
        config.crawler.selector = selector.clone();
    }
    if let Some(rate_limit) = cli.rate_limit {
        config.crawler.rate_limit_ms = rate_limit;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_ms = timeout;
    }
    if let Some(retry_limit) = cli.retry_limit {
        config.crawler.retry_limit = retry_limit;
    }
    if let Some(extract) = cli.extract {
        config.crawler.extract_mode = extract;
    }

    validate_job_options(&config.crawler).context("Invalid crawl options")?;

    Ok(config)
}

/// Reads the newline-separated URL list from a file or stdin
fn read_url_list(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read URL list {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read URL list from stdin")?;
            Ok(buffer)
        }
    }
}
