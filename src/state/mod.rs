//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `WorkerState`: the per-worker state machine (idle, fetching, extracting, dispatching, terminated)
//! - `CrawlCounters`: session-wide counters the workers bump as pages succeed or fail

mod counters;
mod worker_state;

// Re-export main types
pub use counters::{CrawlCounters, CrawlEvent};
pub use worker_state::WorkerState;
