//! Output module: crawl items and their command-line rendering
//!
//! Both crawl strategies yield `CrawlItem`s. Web pages and repository files
//! carry raw bytes; issues and pull requests carry a typed `RepoRecord`
//! alongside its JSON encoding, with the content type as the discriminant
//! hint for consumers that only look at bytes.

mod format;
mod item;

pub use format::{summary_line, write_item, ItemFormat};
pub use item::{CrawlContent, CrawlItem, RepoRecord, TicketRecord, RECORD_CONTENT_TYPE};
