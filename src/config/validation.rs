use crate::config::types::{Config, JobOptions, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Largest accepted gap between task starts (milliseconds)
pub const MAX_RATE_LIMIT_MS: u64 = 30_000;

/// Largest accepted number of retries per task
pub const MAX_RETRY_LIMIT: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_job_options(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates per-job crawl options
pub fn validate_job_options(options: &JobOptions) -> Result<(), ConfigError> {
    if options.rate_limit_ms > MAX_RATE_LIMIT_MS {
        return Err(ConfigError::Validation(format!(
            "rate_limit must be between 0 and {}ms, got {}ms",
            MAX_RATE_LIMIT_MS, options.rate_limit_ms
        )));
    }

    if options.timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "timeout must be greater than 0ms".to_string(),
        ));
    }

    if options.retry_limit > MAX_RETRY_LIMIT {
        return Err(ConfigError::Validation(format!(
            "retry_limit must be between 0 and {}, got {}",
            MAX_RETRY_LIMIT, options.retry_limit
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
