use serde::Deserialize;

/// Default maximum link depth for web crawls
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Default total byte budget for a crawl
pub const DEFAULT_MAX_TOTAL_SIZE: usize = 50 * 1000 * 1000;

/// Default byte cap for a single fetched item
pub const DEFAULT_MAX_PAGE_SIZE: usize = 1000 * 1000;

/// Default maximum number of emitted items
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Main configuration structure for Trawl
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub github: GithubConfig,
}

/// Crawl budget and transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum link depth followed from the seed URL (web crawls only)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Total byte budget across all emitted items
    #[serde(rename = "max-total-size")]
    pub max_total_size: usize,

    /// Byte cap for a single item; larger bodies are truncated
    #[serde(rename = "max-page-size")]
    pub max_page_size: usize,

    /// Maximum number of emitted items
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Overall per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Capacity of the bounded output channel
    #[serde(rename = "channel-capacity")]
    pub channel_capacity: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_total_size: DEFAULT_MAX_TOTAL_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            request_timeout: 30,
            channel_capacity: 16,
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

    /// URL with information about the crawler (optional)
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "trawl".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: String::new(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version` or `Name/Version (+URL)`
    pub fn header_value(&self) -> String {
        if self.contact_url.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, self.contact_url
            )
        }
    }
}

/// Repository provider API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Base URL of the REST API
    #[serde(rename = "api-base")]
    pub api_base: String,

    /// Page size requested from paginated listings
    #[serde(rename = "per-page")]
    pub per_page: u32,

    /// Fallback token used when the locator carries no credential
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com/".to_string(),
            per_page: 100,
            token: None,
        }
    }
}
