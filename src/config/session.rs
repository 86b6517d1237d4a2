use crate::config::types::Config;
use crate::config::validation::validate;
use crate::crawler::ExtractionRules;
use crate::url::{parse_seed, LinkClassifier};
use crate::GleanError;
use std::time::Duration;
use url::Url;

/// Immutable settings for one crawl session
///
/// Built once from the loaded [`Config`] and the requested domain, then
/// shared read-only (behind an `Arc`) by the controller and every worker.
#[derive(Debug, Clone)]
pub struct CrawlSession {
    /// The domain as requested by the caller
    pub domain: String,

    /// `scheme://host[:port]`
    pub base_url: String,

    /// `host[:port]` every followed link must share
    pub base_host: String,

    /// The seed page
    pub start_url: Url,

    pub max_depth: u32,
    pub max_pages: usize,
    pub concurrency: usize,
    pub page_timeout: Duration,
    pub total_timeout: Duration,
    pub idle_timeout: Duration,

    /// Maximum number of URLs ever registered for the session
    pub visited_cap: usize,

    pub classifier: LinkClassifier,
    pub extraction: ExtractionRules,
}

impl CrawlSession {
    /// Creates a session for `domain` from the given configuration
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or when the domain cannot be
    /// turned into an http(s) URL.
    pub fn new(domain: &str, config: &Config) -> Result<Self, GleanError> {
        validate(config)?;
        let seed = parse_seed(domain)?;
        let classifier = LinkClassifier::from_config(&config.filters)?;
        let extraction = ExtractionRules::from_config(&config.extractor);
        let crawler = &config.crawler;

        Ok(Self {
            domain: domain.trim().to_string(),
            base_url: seed.base_url,
            base_host: seed.base_host,
            start_url: seed.start_url,
            max_depth: crawler.max_depth,
            max_pages: crawler.max_pages,
            concurrency: crawler.concurrency,
            page_timeout: Duration::from_millis(crawler.page_timeout_ms),
            total_timeout: Duration::from_millis(crawler.total_timeout_ms),
            idle_timeout: Duration::from_millis(crawler.idle_timeout_ms),
            visited_cap: crawler.max_pages.saturating_mul(crawler.visited_multiplier),
            classifier,
            extraction,
        })
    }
}
