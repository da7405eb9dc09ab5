//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlBudget`: immutable resource limits of one crawl
//! - `CrawlRunState`: worker-owned counters, visited set and abort reason
//! - `WorkerPhase`: lifecycle of a crawl worker
//! - `CrawlOutcome`: what the consumer sees after the stream ends

mod budget;
mod phase;
mod run_state;

// Re-export main types
pub use budget::CrawlBudget;
pub use phase::WorkerPhase;
pub use run_state::{AbortReason, CrawlOutcome, CrawlRunState};
