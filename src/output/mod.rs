//! Output module for crawl results
//!
//! This module handles:
//! - The serialized result handed back to callers of the service
//! - Writing that result as JSON to a file or stdout
//! - Recording crawl statistics

pub mod stats;

pub use stats::{log_statistics, CrawlStatistics};

use crate::GleanError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// The text harvested from one site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    /// `scheme://host[:port]` of the crawled site
    pub domain: String,

    /// When the crawl finished, serialized as RFC 3339
    pub timestamp_utc: DateTime<Utc>,

    /// Page path → extracted text
    pub sections: BTreeMap<String, String>,
}

impl CrawlResult {
    pub fn new(domain: String, sections: BTreeMap<String, String>) -> Self {
        Self {
            domain,
            timestamp_utc: Utc::now(),
            sections,
        }
    }
}

/// Writes `result` as pretty-printed JSON to `path`, or to stdout when `None`
pub fn write_result(result: &CrawlResult, path: Option<&Path>) -> Result<(), GleanError> {
    let json = serde_json::to_string_pretty(result)?;

    match path {
        Some(path) => std::fs::write(path, json + "\n")?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}
