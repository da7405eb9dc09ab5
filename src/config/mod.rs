//! Configuration module for Trawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All keys are optional; an absent file means the built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use trawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("trawl.toml")).unwrap();
//! println!("Crawler will stop after {} bytes", config.crawler.max_total_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, GithubConfig, UserAgentConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES,
    DEFAULT_MAX_PAGE_SIZE, DEFAULT_MAX_TOTAL_SIZE,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
