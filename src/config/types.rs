use serde::Deserialize;

/// Main configuration structure for Sumi-Gather
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: JobOptions,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Per-job crawl options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JobOptions {
    /// CSS selector for the fragment to extract (falls back to `body`)
    pub selector: String,

    /// Minimum gap between two task starts (milliseconds, 0 disables)
    #[serde(rename = "rate-limit")]
    pub rate_limit_ms: u64,

    /// Budget for a single fetch attempt (milliseconds)
    #[serde(rename = "timeout")]
    pub timeout_ms: u64,

    /// Extra attempts after the first failed one
    #[serde(rename = "retry-limit")]
    pub retry_limit: u32,

    /// How the selected fragment is serialized
    #[serde(rename = "extract")]
    pub extract_mode: ExtractMode,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            selector: "body".to_string(),
            rate_limit_ms: 0,
            timeout_ms: 15_000,
            retry_limit: 3,
            extract_mode: ExtractMode::Text,
        }
    }
}

/// Serialization of the selected fragment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Text content of every matched element
    #[default]
    Text,

    /// Inner markup of the first matched element, entity-decoded
    Html,
}

impl std::str::FromStr for ExtractMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown extract mode '{}', expected text or html", other)),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiGather".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/sumi-gather".to_string(),
            contact_email: "crawler@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the user agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}
