//! Priority frontier shared by the worker pool
//!
//! Entries are dequeued highest priority band first, FIFO within a band.
//! Every dequeued entry is handed out inside a [`FrontierLease`]; dropping
//! the lease acknowledges the entry, which is what lets the controller tell
//! "nothing queued and nothing in flight" apart from "nothing queued yet".

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::time::{timeout_at, Instant};
use url::Url;

/// A URL waiting to be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Priority band, higher is dequeued first
    pub priority: u8,

    /// Absolute, normalized URL
    pub url: Url,

    /// Link hops from the seed page
    pub depth: u32,
}

/// Result of waiting on the frontier
#[derive(Debug)]
pub enum FrontierPoll<'a> {
    /// An entry to process; acknowledged when the lease is dropped
    Ready(FrontierLease<'a>),

    /// Nothing arrived within the idle timeout
    Idle,

    /// The frontier was closed by the controller
    Closed,
}

/// Heap slot ordering entries by band, then by insertion sequence
#[derive(Debug)]
struct Queued {
    entry: FrontierEntry,
    seq: u64,
}

// BinaryHeap is a max-heap: higher priority wins, then the lower sequence number
impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        self.entry
            .priority
            .cmp(&other.entry.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Queued {}

#[derive(Debug, Default)]
struct FrontierState {
    heap: BinaryHeap<Queued>,
    next_seq: u64,
    /// Entries put but not yet acknowledged (queued plus in flight)
    outstanding: usize,
    closed: bool,
}

/// Thread-safe priority queue of [`FrontierEntry`] values
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    available: Notify,
    drained: watch::Sender<bool>,
}

impl Frontier {
    pub fn new() -> Self {
        let (drained, _) = watch::channel(true);
        Self {
            state: Mutex::new(FrontierState::default()),
            available: Notify::new(),
            drained,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues `entry` and wakes one waiting worker
    ///
    /// Returns false (and drops the entry) if the frontier is closed.
    pub fn put(&self, entry: FrontierEntry) -> bool {
        {
            let mut state = self.lock();
            if state.closed {
                return false;
            }
            let seq = state.next_seq;
            state.next_seq += 1;
            state.outstanding += 1;
            state.heap.push(Queued { entry, seq });
            self.drained.send_replace(false);
        }
        self.available.notify_one();
        true
    }

    /// Waits up to `idle_timeout` for the next entry
    pub async fn next(&self, idle_timeout: Duration) -> FrontierPoll<'_> {
        let deadline = Instant::now() + idle_timeout;

        loop {
            // Register interest before looking, so a put between the check
            // and the await still wakes us.
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if state.closed {
                    return FrontierPoll::Closed;
                }
                if let Some(queued) = state.heap.pop() {
                    let more = !state.heap.is_empty();
                    drop(state);
                    if more {
                        self.available.notify_one();
                    }
                    return FrontierPoll::Ready(FrontierLease {
                        frontier: self,
                        entry: queued.entry,
                    });
                }
            }

            if timeout_at(deadline, notified).await.is_err() {
                return FrontierPoll::Idle;
            }
        }
    }

    /// Resolves once every entry put so far has been dequeued and acknowledged
    pub async fn wait_drained(&self) {
        let mut drained = self.drained.subscribe();
        // The sender lives in `self`, so this cannot observe a closed channel
        let _ = drained.wait_for(|is_drained| *is_drained).await;
    }

    /// Makes every current and future `next` call return [`FrontierPoll::Closed`]
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of entries waiting to be dequeued
    pub fn len(&self) -> usize {
        self.lock().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries put but not yet acknowledged
    pub fn outstanding(&self) -> usize {
        self.lock().outstanding
    }

    fn acknowledge(&self) {
        let mut state = self.lock();
        state.outstanding = state.outstanding.saturating_sub(1);
        if state.outstanding == 0 {
            self.drained.send_replace(true);
        }
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

/// A dequeued entry; dropping it acknowledges the entry to the frontier
#[derive(Debug)]
pub struct FrontierLease<'a> {
    frontier: &'a Frontier,
    entry: FrontierEntry,
}

impl FrontierLease<'_> {
    pub fn entry(&self) -> &FrontierEntry {
        &self.entry
    }
}

impl Drop for FrontierLease<'_> {
    fn drop(&mut self) {
        self.frontier.acknowledge();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn entry(priority: u8, path: &str) -> FrontierEntry {
        FrontierEntry {
            priority,
            url: Url::parse(&format!("https://example.com{}", path)).unwrap(),
            depth: 1,
        }
    }

    async fn pop_path(frontier: &Frontier) -> String {
        match frontier.next(Duration::from_millis(50)).await {
            FrontierPoll::Ready(lease) => lease.entry().url.path().to_string(),
            other => panic!("expected an entry, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_priority_then_fifo_order() {
        let frontier = Frontier::new();
        frontier.put(entry(0, "/plain"));
        frontier.put(entry(2, "/about"));
        frontier.put(entry(3, "/nav-one"));
        frontier.put(entry(2, "/team"));
        frontier.put(entry(3, "/nav-two"));

        assert_eq!(pop_path(&frontier).await, "/nav-one");
        assert_eq!(pop_path(&frontier).await, "/nav-two");
        assert_eq!(pop_path(&frontier).await, "/about");
        assert_eq!(pop_path(&frontier).await, "/team");
        assert_eq!(pop_path(&frontier).await, "/plain");
    }

    #[tokio::test]
    async fn test_idle_when_nothing_arrives() {
        let frontier = Frontier::new();
        let poll = frontier.next(Duration::from_millis(10)).await;
        assert!(matches!(poll, FrontierPoll::Idle));
    }

    #[tokio::test]
    async fn test_closed_frontier() {
        let frontier = Frontier::new();
        frontier.put(entry(0, "/a"));
        assert!(!frontier.is_closed());
        frontier.close();
        assert!(frontier.is_closed());

        assert!(matches!(
            frontier.next(Duration::from_millis(10)).await,
            FrontierPoll::Closed
        ));
        assert!(!frontier.put(entry(0, "/b")));
    }

    #[tokio::test]
    async fn test_close_wakes_waiting_worker() {
        let frontier = Arc::new(Frontier::new());
        let waiter = {
            let frontier = frontier.clone();
            tokio::spawn(async move {
                matches!(
                    frontier.next(Duration::from_secs(10)).await,
                    FrontierPoll::Closed
                )
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        frontier.close();
        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn test_put_wakes_waiting_worker() {
        let frontier = Arc::new(Frontier::new());
        let waiter = {
            let frontier = frontier.clone();
            tokio::spawn(async move {
                match frontier.next(Duration::from_secs(10)).await {
                    FrontierPoll::Ready(lease) => lease.entry().url.path().to_string(),
                    _ => String::new(),
                }
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        frontier.put(entry(1, "/late"));
        assert_eq!(waiter.await.unwrap(), "/late");
    }

    #[tokio::test]
    async fn test_drained_only_after_acknowledgement() {
        let frontier = Frontier::new();
        frontier.put(entry(1, "/a"));

        let lease = match frontier.next(Duration::from_millis(10)).await {
            FrontierPoll::Ready(lease) => lease,
            other => panic!("expected an entry, got {:?}", other),
        };
        assert!(frontier.is_empty());
        assert_eq!(frontier.outstanding(), 1);

        let still_busy =
            tokio::time::timeout(Duration::from_millis(20), frontier.wait_drained()).await;
        assert!(still_busy.is_err());

        drop(lease);
        tokio::time::timeout(Duration::from_millis(100), frontier.wait_drained())
            .await
            .expect("frontier should be drained");
        assert_eq!(frontier.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_put_during_processing_keeps_frontier_busy() {
        let frontier = Frontier::new();
        frontier.put(entry(1, "/parent"));

        {
            let _lease = match frontier.next(Duration::from_millis(10)).await {
                FrontierPoll::Ready(lease) => lease,
                other => panic!("expected an entry, got {:?}", other),
            };
            frontier.put(entry(0, "/child"));
        }

        assert_eq!(frontier.outstanding(), 1);
        let still_busy =
            tokio::time::timeout(Duration::from_millis(20), frontier.wait_drained()).await;
        assert!(still_busy.is_err());
    }
}
