//! Items produced by both crawl strategies

use serde::Serialize;
use std::borrow::Cow;

/// Content type attached to structured repository records
pub const RECORD_CONTENT_TYPE: &str = "text/json";

/// Summary of an issue or pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketRecord {
    pub title: String,
    pub state: String,
    #[serde(rename = "comments")]
    pub comment_count: u64,
    pub body: Option<String>,
}

/// Structured record emitted by the repository strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RepoRecord {
    Issue(TicketRecord),
    PullRequest(TicketRecord),
}

/// Payload of a crawl item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlContent {
    /// Bytes as fetched (web pages, repository files)
    Raw(Vec<u8>),

    /// Structured record together with its JSON encoding
    Record { record: RepoRecord, encoded: Vec<u8> },
}

impl CrawlContent {
    /// Byte view of the payload; records yield their JSON encoding
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Raw(bytes) => bytes,
            Self::Record { encoded, .. } => encoded,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// The structured record, if this is one
    pub fn record(&self) -> Option<&RepoRecord> {
        match self {
            Self::Raw(_) => None,
            Self::Record { record, .. } => Some(record),
        }
    }
}

/// One document yielded by a crawl
///
/// Ownership passes to the consumer once yielded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlItem {
    pub source_url: String,
    pub content: CrawlContent,
    pub content_type: Option<String>,
}

impl CrawlItem {
    pub fn raw(source_url: impl Into<String>, body: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            source_url: source_url.into(),
            content: CrawlContent::Raw(body),
            content_type,
        }
    }

    /// Wraps a repository record, encoding it once as JSON
    pub fn record(source_url: impl Into<String>, record: RepoRecord) -> serde_json::Result<Self> {
        let encoded = serde_json::to_vec(&record)?;
        Ok(Self {
            source_url: source_url.into(),
            content: CrawlContent::Record { record, encoded },
            content_type: Some(RECORD_CONTENT_TYPE.to_string()),
        })
    }

    /// Size counted against crawl budgets
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Content decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.content.as_bytes())
    }
}
