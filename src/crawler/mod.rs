//! Crawler module: web fetching and the crawl orchestrator
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a per-item byte cap
//! - HTML link extraction
//! - The breadth-first web traversal worker
//! - The output stream shared by both traversal strategies
//!
//! [`Crawler`] classifies a locator and dispatches to the web worker here or
//! to the repository walker in [`crate::github`].

mod fetcher;
mod frontier;
mod parser;
mod stream;
mod web;

pub use fetcher::{build_http_client, Fetched, Fetcher, CONNECT_TIMEOUT};
pub use frontier::{Frontier, QueuedUrl};
pub use parser::{extract_links, is_hypertext};
pub use stream::CrawlStream;

pub(crate) use stream::{launch, Emitter};

use crate::config::{validate, Config};
use crate::github::run_repo_crawl;
use crate::locator::{classify, CrawlTarget};
use crate::state::CrawlBudget;
use crate::Result;
use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Crawl orchestrator
///
/// Holds the validated configuration and one shared HTTP client. Each call
/// to [`crawl`](Self::crawl) spawns an independent worker on the current
/// tokio runtime and returns its output stream.
#[derive(Debug, Clone)]
pub struct Crawler {
    config: Arc<Config>,
    client: Client,
}

impl Crawler {
    /// Creates a crawler from a configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(TrawlError)` - Invalid configuration or HTTP client setup failed
    pub fn new(config: Config) -> Result<Self> {
        validate(&config)?;
        let client = build_http_client(&config.user_agent, &config.crawler)?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Crawls `locator`, returning a lazy stream of items
    ///
    /// Must be called from within a tokio runtime.
    pub fn crawl(&self, locator: &str) -> CrawlStream {
        self.crawl_with_cancellation(locator, CancellationToken::new())
    }

    /// Like [`crawl`](Self::crawl), stopping when `cancel` is cancelled
    pub fn crawl_with_cancellation(&self, locator: &str, cancel: CancellationToken) -> CrawlStream {
        self.crawl_target(classify(locator), cancel)
    }

    /// Crawls an already classified target
    pub fn crawl_target(&self, target: CrawlTarget, cancel: CancellationToken) -> CrawlStream {
        let budget = CrawlBudget::from(&self.config.crawler);
        let capacity = self.config.crawler.channel_capacity;
        // Dropping the stream cancels only this crawl, never the caller's token
        let cancel = cancel.child_token();

        match target {
            CrawlTarget::Web(scope) => {
                let fetcher = Fetcher::new(self.client.clone(), budget.max_item_bytes);
                launch(capacity, cancel, move |emitter| {
                    web::run_web_crawl(fetcher, scope, budget, emitter)
                })
            }
            CrawlTarget::Repo(repo) => {
                tracing::info!("crawling repository {}", repo);
                let client = self.client.clone();
                let github = self.config.github.clone();
                launch(capacity, cancel, move |emitter| {
                    run_repo_crawl(client, github, repo, budget, emitter)
                })
            }
        }
    }
}
