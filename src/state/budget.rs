use crate::config::{
    CrawlerConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES, DEFAULT_MAX_PAGE_SIZE,
    DEFAULT_MAX_TOTAL_SIZE,
};

/// Resource limits for one crawl
///
/// Immutable once the crawl starts and shared read-only by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlBudget {
    /// Link hops followed from the seed (web crawls only)
    pub max_depth: u32,

    /// Byte budget across all emitted items
    pub max_total_bytes: usize,

    /// Byte cap for one item
    pub max_item_bytes: usize,

    /// Maximum number of emitted items
    pub max_items: usize,
}

impl Default for CrawlBudget {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_total_bytes: DEFAULT_MAX_TOTAL_SIZE,
            max_item_bytes: DEFAULT_MAX_PAGE_SIZE,
            max_items: DEFAULT_MAX_PAGES,
        }
    }
}

impl From<&CrawlerConfig> for CrawlBudget {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_total_bytes: config.max_total_size,
            max_item_bytes: config.max_page_size,
            max_items: config.max_pages,
        }
    }
}

impl CrawlBudget {
    /// Returns true if one more item may be emitted after `items_emitted`
    pub fn allows_another_item(&self, items_emitted: usize) -> bool {
        items_emitted < self.max_items
    }

    /// Returns true if `bytes_emitted` is past the total byte budget
    pub fn exceeds_total(&self, bytes_emitted: usize) -> bool {
        bytes_emitted > self.max_total_bytes
    }

    /// Returns true if links found at `depth` may still be followed
    pub fn allows_descent(&self, depth: u32) -> bool {
        depth < self.max_depth
    }
}
