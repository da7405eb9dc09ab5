//! GitHub repository crawling
//!
//! [`GitHubClient`] wraps the few REST endpoints the crawl needs. The walker
//! turns a [`RepoTarget`](crate::locator::RepoTarget) into a stream of
//! issue records, pull request records and file contents.

mod client;
mod types;
mod walker;

pub use client::{parse_next_link, GitHubClient, Pages};
pub use types::{ContentEntry, ContentFile, EntryKind, Issue, PullDetail, PullSummary};

pub(crate) use walker::run_repo_crawl;
