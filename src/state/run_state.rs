//! Worker-local crawl bookkeeping
//!
//! A `CrawlRunState` is created when a worker starts, owned and mutated only
//! by that worker, and turned into a `CrawlOutcome` when the worker exits.

use crate::state::{CrawlBudget, WorkerPhase};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Why a crawl stopped before its frontier ran dry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// Item count or total byte budget exceeded
    SizeExceeded,

    /// Depth budget reached; informational, the frontier still drains
    DepthExhausted,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeExceeded => write!(f, "size_exceeded"),
            Self::DepthExhausted => write!(f, "depth_exhausted"),
        }
    }
}

/// Terminal diagnostics of a finished crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlOutcome {
    pub abort_reason: Option<AbortReason>,
    pub items_emitted: usize,
    pub bytes_emitted: usize,
    /// The consumer cancelled or dropped the stream
    pub cancelled: bool,
    /// The worker hit an internal error or panicked
    pub faulted: bool,
}

impl CrawlOutcome {
    /// Outcome reported when a worker vanished without a final report
    pub fn faulted() -> Self {
        Self {
            faulted: true,
            ..Self::default()
        }
    }
}

/// Mutable state of one crawl worker
#[derive(Debug)]
pub struct CrawlRunState {
    visited_urls: HashSet<String>,
    items_emitted: usize,
    bytes_emitted: usize,
    abort_reason: Option<AbortReason>,
    phase: WorkerPhase,
    cancelled: bool,
    faulted: bool,
}

impl Default for CrawlRunState {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlRunState {
    pub fn new() -> Self {
        Self {
            visited_urls: HashSet::new(),
            items_emitted: 0,
            bytes_emitted: 0,
            abort_reason: None,
            phase: WorkerPhase::Idle,
            cancelled: false,
            faulted: false,
        }
    }

    pub fn phase(&self) -> WorkerPhase {
        self.phase
    }

    pub fn items_emitted(&self) -> usize {
        self.items_emitted
    }

    pub fn bytes_emitted(&self) -> usize {
        self.bytes_emitted
    }

    pub fn abort_reason(&self) -> Option<AbortReason> {
        self.abort_reason
    }

    /// Moves to `next`, ignoring (and logging) illegal transitions
    fn advance(&mut self, next: WorkerPhase) {
        if self.phase.can_transition_to(next) {
            tracing::trace!("worker phase {} -> {}", self.phase, next);
            self.phase = next;
        } else {
            tracing::warn!("ignoring worker phase transition {} -> {}", self.phase, next);
        }
    }

    pub fn start(&mut self) {
        self.advance(WorkerPhase::Running);
    }

    /// Marks `url` visited; returns false if it already was
    pub fn mark_visited(&mut self, url: &str) -> bool {
        if self.visited_urls.contains(url) {
            return false;
        }
        self.visited_urls.insert(url.to_string());
        true
    }

    pub fn has_visited(&self, url: &str) -> bool {
        self.visited_urls.contains(url)
    }

    /// Accounts for an emitted item of `size` bytes
    pub fn record_emission(&mut self, size: usize) {
        self.items_emitted += 1;
        self.bytes_emitted += size;
    }

    pub fn can_emit(&self, budget: &CrawlBudget) -> bool {
        budget.allows_another_item(self.items_emitted)
    }

    pub fn over_byte_budget(&self, budget: &CrawlBudget) -> bool {
        budget.exceeds_total(self.bytes_emitted)
    }

    /// Stops the crawl for `reason`
    pub fn abort(&mut self, reason: AbortReason) {
        self.abort_reason = Some(reason);
        self.advance(WorkerPhase::Aborted);
    }

    /// Records depth exhaustion without stopping; never overrides a size abort
    pub fn note_depth_exhausted(&mut self) {
        if self.abort_reason.is_none() {
            self.abort_reason = Some(AbortReason::DepthExhausted);
        }
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
        if self.phase.is_active() {
            self.advance(WorkerPhase::Aborted);
        }
    }

    pub fn mark_faulted(&mut self) {
        self.faulted = true;
        if self.phase.is_active() {
            self.advance(WorkerPhase::Aborted);
        }
    }

    /// Frontier exhausted without an abort
    pub fn drain(&mut self) {
        if self.phase == WorkerPhase::Running {
            self.advance(WorkerPhase::Draining);
        }
    }

    /// Closes the run and produces the outcome surfaced to the consumer
    pub fn finish(mut self) -> CrawlOutcome {
        if self.phase == WorkerPhase::Idle {
            self.start();
        }
        self.drain();
        self.advance(WorkerPhase::Done);

        CrawlOutcome {
            abort_reason: self.abort_reason,
            items_emitted: self.items_emitted,
            bytes_emitted: self.bytes_emitted,
            cancelled: self.cancelled,
            faulted: self.faulted,
        }
    }
}
