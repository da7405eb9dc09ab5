use crate::config::types::{Config, CrawlerConfig, GithubConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_github_config(&config.github)?;
    Ok(())
}

/// Validates crawl budgets and transport settings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth = 0 is meaningful (seed page only)

    if config.max_page_size == 0 {
        return Err(ConfigError::Validation(
            "max_page_size must be > 0".to_string(),
        ));
    }

    if config.max_total_size == 0 {
        return Err(ConfigError::Validation(
            "max_total_size must be > 0".to_string(),
        ));
    }

    if config.max_pages == 0 {
        return Err(ConfigError::Validation("max_pages must be > 0".to_string()));
    }

    if config.request_timeout == 0 {
        return Err(ConfigError::Validation(
            "request_timeout must be >= 1s".to_string(),
        ));
    }

    if config.channel_capacity == 0 {
        return Err(ConfigError::Validation(
            "channel_capacity must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if !config.contact_url.is_empty() {
        Url::parse(&config.contact_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("contact_url '{}': {}", config.contact_url, e))
        })?;
    }

    Ok(())
}

/// Validates the provider API settings
fn validate_github_config(config: &GithubConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.api_base)
        .map_err(|e| ConfigError::InvalidUrl(format!("api_base '{}': {}", config.api_base, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "api_base must use http or https, got '{}'",
            config.api_base
        )));
    }

    if config.per_page == 0 || config.per_page > 100 {
        return Err(ConfigError::Validation(format!(
            "per_page must be between 1 and 100, got {}",
            config.per_page
        )));
    }

    Ok(())
}
