use crate::output::CrawlStatistics;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Something a worker did that is worth counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlEvent {
    /// A page's text was added to the result store
    PageStored,
    /// An entry was acknowledged without fetching because the store was full
    SkippedAtCap,
    /// Navigation timed out or failed
    NavigationFailed,
    /// The page looked like an error page or had no text
    SoftFailure,
    /// The page's path was already in the result store
    DuplicatePath,
    /// A newly discovered link was put on the frontier
    LinkEnqueued,
}

/// Lock-free counters shared by every worker of a session
#[derive(Debug, Default)]
pub struct CrawlCounters {
    pages_stored: AtomicUsize,
    skipped_at_cap: AtomicUsize,
    navigation_failures: AtomicUsize,
    soft_failures: AtomicUsize,
    duplicate_paths: AtomicUsize,
    links_enqueued: AtomicUsize,
}

impl CrawlCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of `event`
    pub fn record(&self, event: CrawlEvent) {
        let counter = match event {
            CrawlEvent::PageStored => &self.pages_stored,
            CrawlEvent::SkippedAtCap => &self.skipped_at_cap,
            CrawlEvent::NavigationFailed => &self.navigation_failures,
            CrawlEvent::SoftFailure => &self.soft_failures,
            CrawlEvent::DuplicatePath => &self.duplicate_paths,
            CrawlEvent::LinkEnqueued => &self.links_enqueued,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the current counts into a plain statistics value
    pub fn snapshot(&self) -> CrawlStatistics {
        CrawlStatistics {
            pages_stored: self.pages_stored.load(Ordering::Relaxed),
            skipped_at_cap: self.skipped_at_cap.load(Ordering::Relaxed),
            navigation_failures: self.navigation_failures.load(Ordering::Relaxed),
            soft_failures: self.soft_failures.load(Ordering::Relaxed),
            duplicate_paths: self.duplicate_paths.load(Ordering::Relaxed),
            links_enqueued: self.links_enqueued.load(Ordering::Relaxed),
        }
    }
}
