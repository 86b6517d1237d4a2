//! Crawl statistics
//!
//! Counts gathered by the workers while a crawl runs, and helpers for
//! reporting them once it is over.

use serde::Serialize;

/// Crawl statistics summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStatistics {
    /// Pages whose text was stored
    pub pages_stored: usize,

    /// Entries dequeued after the result store filled up
    pub skipped_at_cap: usize,

    /// Navigations that timed out or failed
    pub navigation_failures: usize,

    /// Pages that rendered but were empty or looked like error pages
    pub soft_failures: usize,

    /// Pages whose path had already been stored
    pub duplicate_paths: usize,

    /// Links put on the frontier
    pub links_enqueued: usize,
}

impl CrawlStatistics {
    /// Pages that were actually fetched (successfully or not)
    pub fn pages_attempted(&self) -> usize {
        self.pages_stored + self.navigation_failures + self.soft_failures + self.duplicate_paths
    }

    /// Share of attempted pages that ended up stored, in percent
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_attempted();
        if attempted == 0 {
            return 0.0;
        }
        (self.pages_stored as f64 / attempted as f64) * 100.0
    }
}

/// Logs statistics in a formatted manner
///
/// Goes through `tracing` rather than stdout, which carries the JSON result.
pub fn log_statistics(stats: &CrawlStatistics) {
    tracing::info!("=== Crawl Statistics ===");
    tracing::info!("  Pages stored: {}", stats.pages_stored);
    tracing::info!("  Links enqueued: {}", stats.links_enqueued);
    tracing::info!("  Skipped at page cap: {}", stats.skipped_at_cap);
    tracing::info!("  Navigation failures: {}", stats.navigation_failures);
    tracing::info!("  Soft failures: {}", stats.soft_failures);
    if stats.duplicate_paths > 0 {
        tracing::info!("  Duplicate paths: {}", stats.duplicate_paths);
    }
    tracing::info!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        stats.success_rate(),
        stats.pages_stored,
        stats.pages_attempted()
    );
}
