//! Crawler coordinator - main crawl orchestration logic
//!
//! This module seeds the frontier, runs the worker pool and decides when
//! the crawl is over:
//! - the frontier drained (nothing queued, nothing in flight)
//! - every worker went idle and exited
//! - the total wall-clock budget ran out (partial results are kept)

use crate::config::CrawlSession;
use crate::crawler::worker::{run_worker, CrawlContext};
use crate::output::CrawlStatistics;
use crate::render::{RenderError, Renderer};
use crate::GleanError;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlTermination {
    /// Every queued entry was processed and acknowledged
    Drained,

    /// Every worker exited without the frontier draining
    WorkersIdle,

    /// The total timeout fired; in-flight work was abandoned
    TimedOut,
}

impl CrawlTermination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drained => "drained",
            Self::WorkersIdle => "workers-idle",
            Self::TimedOut => "timed-out",
        }
    }
}

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// `scheme://host[:port]` of the crawled site
    pub base_url: String,

    /// Page path → extracted text
    pub sections: BTreeMap<String, String>,

    pub termination: CrawlTermination,
    pub stats: CrawlStatistics,
    pub elapsed: Duration,
}

type WorkerResult = Result<(), RenderError>;

/// Crawls one site under the session's budgets
///
/// Per-page failures never fail the crawl. It fails only when a worker
/// panics, or when no page could be opened at all and nothing was stored.
pub async fn run_crawl(
    session: CrawlSession,
    renderer: Arc<dyn Renderer>,
) -> Result<CrawlReport, GleanError> {
    let started = Instant::now();
    let session = Arc::new(session);
    let ctx = Arc::new(CrawlContext::new(session.clone()));

    info!(
        "Crawling {} (max {} pages, depth {}, {} workers, {:?} budget)",
        session.base_url,
        session.max_pages,
        session.max_depth,
        session.concurrency,
        session.total_timeout
    );

    ctx.seed();

    let mut workers = JoinSet::new();
    for id in 0..session.concurrency {
        workers.spawn(run_worker(id, ctx.clone(), renderer.clone()));
    }

    let mut failures = Vec::new();
    let outcome = tokio::time::timeout(
        session.total_timeout,
        wait_for_completion(&ctx, &mut workers, &mut failures),
    )
    .await;

    let termination = match outcome {
        Ok(termination) => {
            let termination = termination?;
            ctx.frontier.close();
            while let Some(joined) = workers.join_next().await {
                record_exit(joined, &mut failures)?;
            }
            termination
        }
        Err(_) => {
            warn!(
                "Total timeout of {:?} reached for {}, returning {} partial results",
                session.total_timeout,
                session.base_url,
                ctx.results.len()
            );
            ctx.frontier.close();
            workers.shutdown().await;
            CrawlTermination::TimedOut
        }
    };

    let sections = ctx.results.snapshot();
    if sections.is_empty() && !failures.is_empty() {
        return Err(GleanError::Render(failures.remove(0)));
    }

    let report = CrawlReport {
        base_url: session.base_url.clone(),
        sections,
        termination,
        stats: ctx.counters.snapshot(),
        elapsed: started.elapsed(),
    };

    info!(
        "Crawl of {} finished ({}): {} pages in {:?}",
        report.base_url,
        termination.as_str(),
        report.sections.len(),
        report.elapsed
    );

    Ok(report)
}

/// Waits until the frontier drains or every worker has exited
async fn wait_for_completion(
    ctx: &CrawlContext,
    workers: &mut JoinSet<WorkerResult>,
    failures: &mut Vec<RenderError>,
) -> Result<CrawlTermination, GleanError> {
    loop {
        tokio::select! {
            biased;

            _ = ctx.frontier.wait_drained() => return Ok(CrawlTermination::Drained),
            joined = workers.join_next() => match joined {
                Some(joined) => record_exit(joined, failures)?,
                None => return Ok(CrawlTermination::WorkersIdle),
            },
        }
    }
}

/// Sorts a finished worker into success, page failure or fatal panic
fn record_exit(
    joined: Result<WorkerResult, JoinError>,
    failures: &mut Vec<RenderError>,
) -> Result<(), GleanError> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            warn!("Worker could not open a page: {}", e);
            failures.push(e);
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            debug!("Worker cancelled");
            Ok(())
        }
        Err(e) => Err(GleanError::Worker(e)),
    }
}
