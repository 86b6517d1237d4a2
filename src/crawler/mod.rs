//! Crawler module for budgeted single-site crawling
//!
//! This module contains the core crawling logic, including:
//! - The priority frontier and its acknowledgement leases
//! - The visited registry and the bounded result store
//! - Text extraction rules
//! - The worker pool and the controller that runs it

mod coordinator;
mod extractor;
mod frontier;
mod results;
mod visited;
mod worker;

pub use coordinator::{run_crawl, CrawlReport, CrawlTermination};
pub use extractor::{clean_text, Extraction, ExtractionRules};
pub use frontier::{Frontier, FrontierEntry, FrontierLease, FrontierPoll};
pub use results::{ResultStore, StoreOutcome};
pub use visited::{Registration, VisitedRegistry};
pub use worker::{run_worker, CrawlContext};
