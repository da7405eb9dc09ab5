//! Frontier queue for the web strategy
//!
//! Breadth-first: URLs are fetched in the order they were discovered, and
//! each entry carries the link depth at which it was found.

use std::collections::VecDeque;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The URL to fetch
    pub url: String,

    /// Link hops from the seed (the seed itself is 0)
    pub depth: u32,
}

impl QueuedUrl {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// FIFO of discovered but not yet fetched URLs
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<QueuedUrl>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding only the seed at depth 0
    pub fn seeded(seed_url: impl Into<String>) -> Self {
        let mut frontier = Self::new();
        frontier.push(QueuedUrl::new(seed_url, 0));
        frontier
    }

    pub fn push(&mut self, url: QueuedUrl) {
        self.queue.push_back(url);
    }

    pub fn pop(&mut self) -> Option<QueuedUrl> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
