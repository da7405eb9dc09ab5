//! HTTP fetcher implementation
//!
//! This module handles all web page retrieval for the crawler:
//! - Building the shared HTTP client with the configured user agent
//! - Streaming GET requests with a per-item byte cap
//! - Turning network failures into "no result" instead of errors

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

/// Connection establishment timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A successfully retrieved resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// Body bytes, at most the fetcher's byte cap
    pub body: Vec<u8>,

    /// Content-Type header value, verbatim
    pub content_type: Option<String>,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Crawler settings (overall request timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use trawl::config::{CrawlerConfig, UserAgentConfig};
/// use trawl::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(CONNECT_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs bounded single-resource retrievals
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_item_bytes: usize,
}

impl Fetcher {
    pub fn new(client: Client, max_item_bytes: usize) -> Self {
        Self {
            client,
            max_item_bytes,
        }
    }

    /// Fetches `url`, reading at most `max_item_bytes` of its body
    ///
    /// # Behavior
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Connection refused, DNS failure, timeout | `None` |
    /// | Non-success HTTP status | `None` |
    /// | Error while reading the body | `None` |
    /// | Body larger than the cap | `Some`, truncated at the cap |
    ///
    /// Reading stops at the cap and the response is dropped; the oversize
    /// event is logged, not treated as an error.
    pub async fn fetch(&self, url: &str) -> Option<Fetched> {
        let mut response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                if e.is_timeout() {
                    tracing::info!("timeout fetching {}", url);
                } else if e.is_connect() {
                    tracing::info!("connection failed for {}: {}", url, e);
                } else {
                    tracing::info!("exception fetching {}: {}", url, e);
                }
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::info!("{} returned HTTP {}", url, status.as_u16());
            return None;
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut body = Vec::new();

        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    let remaining = self.max_item_bytes - body.len();
                    if chunk.len() > remaining {
                        body.extend_from_slice(&chunk[..remaining]);
                        tracing::warn!("ignoring the rest of {}: too big", url);
                        break;
                    }
                    body.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::info!("error reading body of {}: {}", url, e);
                    return None;
                }
            }
        }

        Some(Fetched { body, content_type })
    }
}
