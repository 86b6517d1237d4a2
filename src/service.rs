//! Service boundary
//!
//! `crawl_domain` is what callers (the CLI, or an HTTP front end) use: it
//! runs a whole crawl and maps every failure onto a two-variant error with
//! an HTTP-style status code.

use crate::config::{Config, CrawlSession};
use crate::crawler::run_crawl;
use crate::output::{log_statistics, CrawlResult};
use crate::render::{build_renderer, Renderer};
use crate::GleanError;
use std::sync::Arc;
use thiserror::Error;

/// Failure of a crawl as seen by callers of the service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Nothing usable was captured
    #[error("Could not crawl the domain or found no content.")]
    NotFound,

    /// Anything else went wrong
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// HTTP status code matching the error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Internal(_) => 500,
        }
    }
}

impl From<GleanError> for ServiceError {
    fn from(err: GleanError) -> Self {
        match err {
            GleanError::NoContentCaptured { .. } => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Crawls `domain` with the renderer selected by `config`
///
/// # Example
///
/// ```no_run
/// use site_gleaner::{crawl_domain, Config};
///
/// # async fn run() {
/// let result = crawl_domain("example.com", &Config::default()).await.unwrap();
/// for (path, text) in &result.sections {
///     println!("{}: {} chars", path, text.chars().count());
/// }
/// # }
/// ```
pub async fn crawl_domain(domain: &str, config: &Config) -> Result<CrawlResult, ServiceError> {
    let renderer = build_renderer(config).await.map_err(|e| {
        tracing::error!("Failed to start renderer: {}", e);
        ServiceError::from(e)
    })?;
    crawl_with_renderer(domain, config, renderer).await
}

/// Crawls `domain` with an already constructed renderer
pub async fn crawl_with_renderer(
    domain: &str,
    config: &Config,
    renderer: Arc<dyn Renderer>,
) -> Result<CrawlResult, ServiceError> {
    tracing::info!("Received crawl request for {}", domain);

    match gather(domain, config, renderer).await {
        Ok(result) => {
            tracing::info!(
                "Crawl of {} returned {} sections",
                result.domain,
                result.sections.len()
            );
            Ok(result)
        }
        Err(e) => {
            tracing::error!("Crawl of {} failed: {}", domain, e);
            Err(e.into())
        }
    }
}

async fn gather(
    domain: &str,
    config: &Config,
    renderer: Arc<dyn Renderer>,
) -> Result<CrawlResult, GleanError> {
    let session = CrawlSession::new(domain, config)?;
    let report = run_crawl(session, renderer).await?;
    log_statistics(&report.stats);

    if report.sections.is_empty() {
        return Err(GleanError::NoContentCaptured {
            domain: report.base_url,
        });
    }

    Ok(CrawlResult::new(report.base_url, report.sections))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ServiceError::NotFound.status_code(), 404);
        assert_eq!(ServiceError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            ServiceError::NotFound.to_string(),
            "Could not crawl the domain or found no content."
        );
    }

    #[test]
    fn test_error_mapping() {
        let empty = GleanError::NoContentCaptured {
            domain: "https://example.com".into(),
        };
        assert!(matches!(ServiceError::from(empty), ServiceError::NotFound));

        let internal = GleanError::UrlError(crate::UrlError::MissingDomain);
        assert!(matches!(
            ServiceError::from(internal),
            ServiceError::Internal(_)
        ));
    }

    #[tokio::test]
    async fn test_invalid_domain_is_internal() {
        let result = crawl_domain("ftp://example.com", &Config::default()).await;
        assert!(matches!(result, Err(ServiceError::Internal(_))));
    }
}
