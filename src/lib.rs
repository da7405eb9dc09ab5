//! Trawl: a bounded content crawler
//!
//! This crate streams documents from two kinds of sources behind one API:
//! web sites reached by following hyperlinks inside a URL prefix, and hosted
//! source repositories (issues, pull requests, file tree) reached through the
//! provider's REST API. Every crawl is bounded by depth, item count and byte
//! budgets, and always ends with a clean end-of-stream.

pub mod config;
pub mod crawler;
pub mod github;
pub mod locator;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Trawl operations
#[derive(Debug, Error)]
pub enum TrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Provider returned HTTP {status} for {url}")]
    Provider { url: String, status: u16 },

    #[error("Invalid API base URL: {0}")]
    InvalidApiBase(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to decode content of {path}: {message}")]
    Decode { path: String, message: String },
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

/// Result type alias for Trawl operations
pub type Result<T> = std::result::Result<T, TrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlStream, Crawler};
pub use locator::{classify, CrawlTarget, RepoAuth, RepoTarget, WebScope};
pub use output::{CrawlContent, CrawlItem, RepoRecord};
pub use state::{AbortReason, CrawlBudget, CrawlOutcome};
