/// Worker state definitions for tracking a worker's progress through a page
///
/// Every worker cycles Idle → Fetching → Extracting → Dispatching → Idle
/// until the frontier goes quiet or the crawl is cancelled.
use std::fmt;

/// Represents the current state of a crawl worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Waiting on the frontier for the next entry
    Idle,

    /// Navigating the renderer to the entry's URL
    Fetching,

    /// Reading the primary text of the rendered page
    Extracting,

    /// Enqueueing the relevant links found on the page
    Dispatching,

    /// The worker has exited and will not restart
    Terminated,
}

impl WorkerState {
    /// Returns true if the worker has stopped for good
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Returns true while the worker is working on a dequeued entry
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Fetching | Self::Extracting | Self::Dispatching)
    }

    /// Returns true if moving from this state to `next` is a legal step
    ///
    /// Any state may jump back to Idle (the page was skipped or failed) or
    /// straight to Terminated (cancellation). Terminated is final.
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        match (self, next) {
            (Self::Terminated, _) => false,
            (_, Self::Terminated) | (_, Self::Idle) => true,
            (Self::Idle, Self::Fetching) => true,
            (Self::Fetching, Self::Extracting) => true,
            (Self::Extracting, Self::Dispatching) => true,
            _ => false,
        }
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Dispatching => "dispatching",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
