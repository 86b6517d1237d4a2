//! Crawl workers
//!
//! A worker owns one rendered page for its whole life and loops over the
//! frontier: fetch, extract, store, dispatch. Every per-page failure is
//! logged and swallowed; only failing to open a page ends a worker early.

use crate::config::CrawlSession;
use crate::crawler::extractor::Extraction;
use crate::crawler::frontier::{Frontier, FrontierEntry, FrontierPoll};
use crate::crawler::results::{ResultStore, StoreOutcome};
use crate::crawler::visited::{Registration, VisitedRegistry};
use crate::render::{AnchorLink, RenderError, RenderedPage, Renderer};
use crate::state::{CrawlCounters, CrawlEvent, WorkerState};
use crate::url::{path_key, resolve_link, NAV_PRIORITY};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Depth of the start URL; pages at `max_depth` are fetched but do not dispatch
pub const SEED_DEPTH: u32 = 1;

/// Everything the workers of one session share
#[derive(Debug)]
pub struct CrawlContext {
    pub session: Arc<CrawlSession>,
    pub frontier: Frontier,
    pub visited: VisitedRegistry,
    pub results: ResultStore,
    pub counters: CrawlCounters,
}

impl CrawlContext {
    pub fn new(session: Arc<CrawlSession>) -> Self {
        Self {
            frontier: Frontier::new(),
            visited: VisitedRegistry::new(session.visited_cap),
            results: ResultStore::new(session.max_pages),
            counters: CrawlCounters::new(),
            session,
        }
    }

    /// Registers the start URL and queues it at the navigation band, [`SEED_DEPTH`]
    pub fn seed(&self) -> bool {
        let url = self.session.start_url.clone();
        if self.visited.register(&url) != Registration::New {
            return false;
        }
        self.frontier.put(FrontierEntry {
            priority: NAV_PRIORITY,
            url,
            depth: SEED_DEPTH,
        })
    }

    /// Queues the relevant, unseen links of a page one level below `parent`
    ///
    /// Hrefs are deduplicated first; an href counts as a navigation link if
    /// any of its anchors sat inside a `<nav>`. Stops early once the visited
    /// registry is full. Returns how many entries were queued.
    pub fn dispatch(&self, parent: &FrontierEntry, links: Vec<AnchorLink>) -> usize {
        let session = &self.session;
        let mut distinct: Vec<(String, bool)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for link in links {
            match positions.get(&link.href) {
                Some(&i) => distinct[i].1 |= link.in_nav,
                None => {
                    positions.insert(link.href.clone(), distinct.len());
                    distinct.push((link.href, link.in_nav));
                }
            }
        }

        let mut enqueued = 0;
        for (href, in_nav) in distinct {
            if let Some(reason) = session.classifier.rejection(&href, &session.base_host) {
                trace!("Skipping link {:?}: {:?}", href, reason);
                continue;
            }

            let Some(url) = resolve_link(&parent.url, &href) else {
                continue;
            };

            match self.visited.register(&url) {
                Registration::New => {}
                Registration::Seen => continue,
                Registration::Full => {
                    debug!("Visited registry full, not following further links");
                    break;
                }
            }

            let entry = FrontierEntry {
                priority: session.classifier.link_priority(url.path(), in_nav),
                url,
                depth: parent.depth + 1,
            };
            if self.frontier.put(entry) {
                self.counters.record(CrawlEvent::LinkEnqueued);
                enqueued += 1;
            }
        }

        enqueued
    }
}

/// Runs one worker until the frontier goes idle or is closed
///
/// Fails only when the renderer cannot open a page for this worker.
pub async fn run_worker(
    id: usize,
    ctx: Arc<CrawlContext>,
    renderer: Arc<dyn Renderer>,
) -> Result<(), RenderError> {
    let mut page = renderer.open_page().await?;

    let mut worker = Worker {
        id,
        state: WorkerState::Idle,
        ctx,
    };
    worker.run(page.as_mut()).await;

    page.close().await;
    Ok(())
}

struct Worker {
    id: usize,
    state: WorkerState,
    ctx: Arc<CrawlContext>,
}

impl Worker {
    fn transition(&mut self, next: WorkerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal worker transition {} -> {}",
            self.state,
            next
        );
        trace!("Worker {}: {} -> {}", self.id, self.state, next);
        self.state = next;
    }

    async fn run(&mut self, page: &mut dyn RenderedPage) {
        let ctx = self.ctx.clone();

        loop {
            let lease = match ctx.frontier.next(ctx.session.idle_timeout).await {
                FrontierPoll::Ready(lease) => lease,
                FrontierPoll::Idle => {
                    debug!("Worker {} idle, exiting", self.id);
                    break;
                }
                FrontierPoll::Closed => break,
            };

            self.process(page, lease.entry()).await;

            if self.state != WorkerState::Idle {
                self.transition(WorkerState::Idle);
            }
        }

        self.transition(WorkerState::Terminated);
    }

    async fn process(&mut self, page: &mut dyn RenderedPage, entry: &FrontierEntry) {
        let ctx = self.ctx.clone();
        let session = &ctx.session;

        if ctx.results.is_full() {
            ctx.counters.record(CrawlEvent::SkippedAtCap);
            return;
        }

        self.transition(WorkerState::Fetching);
        if let Err(e) = page.navigate(&entry.url, session.page_timeout).await {
            debug!("Skipping {}: {}", entry.url, e);
            ctx.counters.record(CrawlEvent::NavigationFailed);
            return;
        }

        self.transition(WorkerState::Extracting);
        let raw = match page.extract_main_text(&session.extraction).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Could not extract text from {}: {}", entry.url, e);
                ctx.counters.record(CrawlEvent::SoftFailure);
                return;
            }
        };

        match session.extraction.finish(&raw) {
            Extraction::SoftFailure => {
                debug!("No usable content at {}", entry.url);
                ctx.counters.record(CrawlEvent::SoftFailure);
                return;
            }
            Extraction::Content(text) => {
                let path = path_key(&entry.url);
                match ctx.results.insert(&path, text) {
                    StoreOutcome::Stored => {
                        debug!("Stored {} (depth {})", path, entry.depth);
                        ctx.counters.record(CrawlEvent::PageStored);
                    }
                    StoreOutcome::Duplicate => {
                        debug!("Path {} already stored", path);
                        ctx.counters.record(CrawlEvent::DuplicatePath);
                    }
                    StoreOutcome::Full => {
                        ctx.counters.record(CrawlEvent::SkippedAtCap);
                        return;
                    }
                }
            }
        }

        if entry.depth >= session.max_depth {
            return;
        }

        self.transition(WorkerState::Dispatching);
        match page.extract_links().await {
            Ok(links) => {
                let queued = ctx.dispatch(entry, links);
                trace!("Worker {} queued {} links from {}", self.id, queued, entry.url);
            }
            Err(e) => debug!("Could not list links on {}: {}", entry.url, e),
        }
    }
}
