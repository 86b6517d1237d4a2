//! Integration tests for the crawler
//!
//! Most tests drive the full worker pool against an in-memory site served
//! by a scripted renderer; the last ones use wiremock to run the static
//! HTTP renderer end-to-end.

use async_trait::async_trait;
use site_gleaner::config::{Config, CrawlSession};
use site_gleaner::crawler::{run_crawl, CrawlReport, CrawlTermination, ExtractionRules};
use site_gleaner::render::{
    anchors, main_text, AnchorLink, RenderError, RenderedPage, Renderer, StaticRenderer,
};
use site_gleaner::service::{crawl_with_renderer, ServiceError};
use site_gleaner::GleanError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves a fixed set of pages keyed by path, recording every navigation
#[derive(Clone, Default)]
struct ScriptedRenderer {
    pages: Arc<HashMap<String, String>>,
    delay: Option<Duration>,
    visits: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRenderer {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .iter()
                    .map(|(p, html)| (p.to_string(), html.to_string()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn visited(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn open_page(&self) -> Result<Box<dyn RenderedPage>, RenderError> {
        Ok(Box::new(ScriptedPage {
            site: self.clone(),
            html: None,
        }))
    }
}

struct ScriptedPage {
    site: ScriptedRenderer,
    html: Option<String>,
}

#[async_trait]
impl RenderedPage for ScriptedPage {
    async fn navigate(&mut self, url: &Url, _timeout: Duration) -> Result<(), RenderError> {
        self.site.visits.lock().unwrap().push(url.path().to_string());
        if let Some(delay) = self.site.delay {
            tokio::time::sleep(delay).await;
        }

        match self.site.pages.get(url.path()) {
            Some(html) => {
                self.html = Some(html.clone());
                Ok(())
            }
            None => Err(RenderError::Navigation {
                url: url.to_string(),
                message: "HTTP 404".to_string(),
            }),
        }
    }

    async fn extract_main_text(&mut self, rules: &ExtractionRules) -> Result<String, RenderError> {
        let html = self.html.as_deref().ok_or(RenderError::NoPage)?;
        Ok(main_text(html, rules))
    }

    async fn extract_links(&mut self) -> Result<Vec<AnchorLink>, RenderError> {
        let html = self.html.as_deref().ok_or(RenderError::NoPage)?;
        Ok(anchors(html))
    }

    async fn close(&mut self) {
        self.html = None;
    }
}

/// A renderer that cannot open any page
struct BrokenRenderer;

#[async_trait]
impl Renderer for BrokenRenderer {
    async fn open_page(&self) -> Result<Box<dyn RenderedPage>, RenderError> {
        Err(RenderError::Browser("no browser available".to_string()))
    }
}

/// Default configuration with a short idle timeout so tests finish quickly
fn test_config() -> Config {
    let mut config = Config::default();
    config.crawler.idle_timeout_ms = 200;
    config.crawler.total_timeout_ms = 10_000;
    config
}

async fn crawl(config: &Config, renderer: &ScriptedRenderer) -> CrawlReport {
    let session = CrawlSession::new("example.com", config).unwrap();
    run_crawl(session, Arc::new(renderer.clone())).await.unwrap()
}

#[tokio::test]
async fn test_priority_link_followed_ignored_link_skipped() {
    let renderer = ScriptedRenderer::new(&[
        (
            "/",
            r#"<html><body><main>Welcome to Example Corp.
               <a href="/about">About</a> <a href="/legal">Legal</a></main></body></html>"#,
        ),
        ("/about", "<html><body><main>We make widgets.</main></body></html>"),
        ("/legal", "<html><body><main>Legal notice.</main></body></html>"),
    ]);

    let report = crawl(&test_config(), &renderer).await;

    assert_eq!(report.termination, CrawlTermination::Drained);
    assert_eq!(report.base_url, "https://example.com");
    assert_eq!(report.sections["/about"], "We make widgets.");
    assert!(report.sections.contains_key("/"));
    assert!(!report.sections.contains_key("/legal"));
    assert!(!renderer.visited().contains(&"/legal".to_string()));
    assert_eq!(report.stats.links_enqueued, 1);
}

#[tokio::test]
async fn test_denylisted_nav_link_not_followed() {
    let renderer = ScriptedRenderer::new(&[
        (
            "/",
            r#"<html><body>
               <nav><a href="/contact">Contact</a><a href="/team">Team</a></nav>
               <main>Home page</main></body></html>"#,
        ),
        ("/contact", "<html><body><main>Call us.</main></body></html>"),
        ("/team", "<html><body><main>Our team.</main></body></html>"),
    ]);

    let report = crawl(&test_config(), &renderer).await;

    let visited = renderer.visited();
    assert!(visited.contains(&"/team".to_string()));
    assert!(!visited.contains(&"/contact".to_string()));
    assert_eq!(report.sections.len(), 2);
}

#[tokio::test]
async fn test_total_timeout_returns_promptly() {
    let renderer = ScriptedRenderer::new(&[("/", "<html><body><main>Slow</main></body></html>")])
        .with_delay(Duration::from_secs(5));

    let mut config = test_config();
    config.crawler.total_timeout_ms = 1;
    let session = CrawlSession::new("example.com", &config).unwrap();

    let report = tokio::time::timeout(
        Duration::from_secs(2),
        run_crawl(session, Arc::new(renderer.clone())),
    )
    .await
    .expect("crawl should stop at its total timeout")
    .unwrap();

    assert_eq!(report.termination, CrawlTermination::TimedOut);
    assert!(report.sections.is_empty());
}

#[tokio::test]
async fn test_not_found_page_excluded() {
    let renderer = ScriptedRenderer::new(&[
        (
            "/",
            r#"<html><body><main>Home <a href="/about-old">Old about page</a></main></body></html>"#,
        ),
        ("/about-old", "<html><body><main>Page Not Found</main></body></html>"),
    ]);

    let report = crawl(&test_config(), &renderer).await;

    assert!(renderer.visited().contains(&"/about-old".to_string()));
    assert!(!report.sections.contains_key("/about-old"));
    assert_eq!(report.stats.soft_failures, 1);
    assert_eq!(report.sections.len(), 1);
}

#[tokio::test]
async fn test_page_cap_drains_frontier() {
    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/section-{}">Section {}</a>"#, i, i))
        .collect();
    let home = format!("<html><body><main>Home {}</main></body></html>", links);

    let mut pages = vec![("/".to_string(), home)];
    for i in 0..10 {
        pages.push((
            format!("/section-{}", i),
            format!("<html><body><main>Section {}</main></body></html>", i),
        ));
    }
    let pages: Vec<(&str, &str)> = pages.iter().map(|(p, h)| (p.as_str(), h.as_str())).collect();
    let renderer = ScriptedRenderer::new(&pages);

    let mut config = test_config();
    config.crawler.max_pages = 1;
    config.crawler.visited_multiplier = 20;

    let report = crawl(&config, &renderer).await;

    assert_eq!(report.sections.len(), 1);
    assert!(report.sections.contains_key("/"));
    assert_eq!(report.termination, CrawlTermination::Drained);
    assert_eq!(report.stats.links_enqueued, 10);
    assert_eq!(report.stats.skipped_at_cap, 10);
    assert_eq!(renderer.visited(), vec!["/".to_string()]);
}

#[tokio::test]
async fn test_visited_cap_limits_enqueued_links() {
    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/section-{}">Section {}</a>"#, i, i))
        .collect();
    let home = format!("<html><body><main>Home {}</main></body></html>", links);
    let renderer = ScriptedRenderer::new(&[("/", home.as_str())]);

    let mut config = test_config();
    config.crawler.max_pages = 1;

    let report = crawl(&config, &renderer).await;

    // The seed takes one of the five registry slots
    assert_eq!(report.stats.links_enqueued, 4);
    assert_eq!(report.stats.skipped_at_cap, 4);
}

/// `/ -> /about -> /about/team -> /about/team/alice`
fn chain_site() -> ScriptedRenderer {
    ScriptedRenderer::new(&[
        ("/", r#"<html><body><main>Home <a href="/about">About</a></main></body></html>"#),
        (
            "/about",
            r#"<html><body><main>About <a href="/about/team">Team</a></main></body></html>"#,
        ),
        (
            "/about/team",
            r#"<html><body><main>Team <a href="/about/team/alice">Alice</a></main></body></html>"#,
        ),
        ("/about/team/alice", "<html><body><main>Alice.</main></body></html>"),
    ])
}

#[tokio::test]
async fn test_default_depth_follows_one_hop() {
    let renderer = chain_site();

    let report = crawl(&test_config(), &renderer).await;

    let mut visited = renderer.visited();
    visited.sort();
    assert_eq!(visited, vec!["/", "/about"]);
    assert_eq!(report.sections.keys().collect::<Vec<_>>(), vec!["/", "/about"]);
    assert_eq!(report.stats.links_enqueued, 1);
}

#[tokio::test]
async fn test_deeper_max_depth_follows_more_hops() {
    let renderer = chain_site();
    let mut config = test_config();
    config.crawler.max_depth = 3;

    let report = crawl(&config, &renderer).await;

    assert!(report.sections.contains_key("/about/team"));
    assert!(!renderer.visited().contains(&"/about/team/alice".to_string()));
}

#[tokio::test]
async fn test_depth_one_fetches_only_the_start_page() {
    let renderer = chain_site();
    let mut config = test_config();
    config.crawler.max_depth = 1;

    let report = crawl(&config, &renderer).await;

    assert_eq!(renderer.visited(), vec!["/".to_string()]);
    assert_eq!(report.sections.len(), 1);
    assert_eq!(report.stats.links_enqueued, 0);
}

#[tokio::test]
async fn test_each_url_visited_once() {
    let renderer = ScriptedRenderer::new(&[
        (
            "/",
            r#"<html><body><main>Home <a href="/about">About</a> <a href="/company">Company</a></main></body></html>"#,
        ),
        (
            "/about",
            r#"<html><body><main>About <a href="/">Home</a> <a href="/company#team">Company</a></main></body></html>"#,
        ),
        (
            "/company",
            r#"<html><body><main>Company <a href="/about?utm_source=x">About</a></main></body></html>"#,
        ),
    ]);

    let report = crawl(&test_config(), &renderer).await;

    let mut visited = renderer.visited();
    visited.sort();
    assert_eq!(visited, vec!["/", "/about", "/company"]);
    assert_eq!(report.sections.len(), 3);
}

#[tokio::test]
async fn test_navigation_failures_are_skipped() {
    let renderer = ScriptedRenderer::new(&[(
        "/",
        r#"<html><body><main>Home <a href="/about">About</a> <a href="/news">News</a></main></body></html>"#,
    )]);

    let report = crawl(&test_config(), &renderer).await;

    assert_eq!(report.sections.len(), 1);
    assert_eq!(report.stats.navigation_failures, 2);
    assert_eq!(report.termination, CrawlTermination::Drained);
}

#[tokio::test]
async fn test_renderer_failure_is_reported() {
    let session = CrawlSession::new("example.com", &test_config()).unwrap();
    let result = run_crawl(session, Arc::new(BrokenRenderer)).await;

    assert!(matches!(result, Err(GleanError::Render(_))));
}

#[tokio::test]
async fn test_service_reports_not_found_for_empty_site() {
    let renderer = ScriptedRenderer::new(&[("/", "<html><body><main>Page not found</main></body></html>")]);

    let result = crawl_with_renderer("example.com", &test_config(), Arc::new(renderer)).await;

    match result {
        Err(e @ ServiceError::NotFound) => assert_eq!(e.status_code(), 404),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_static_renderer_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body>
               <header><nav><a href="/about">About</a><a href="/privacy">Privacy</a></nav></header>
               <main><h1>Acme</h1><p>Rockets and anvils.</p><a href="/products">Products</a></main>
               <footer>© Acme</footer>
               </body></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><article>Founded in the desert.</article></body></html>",
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF", "application/pdf"))
        .mount(&server)
        .await;

    let config = test_config();
    let renderer = StaticRenderer::new(&config.user_agent, Duration::from_secs(5)).unwrap();

    let result = crawl_with_renderer(&server.uri(), &config, Arc::new(renderer))
        .await
        .unwrap();

    assert_eq!(result.domain, server.uri());
    assert_eq!(result.sections["/"], "Acme Rockets and anvils. Products");
    assert_eq!(result.sections["/about"], "Founded in the desert.");
    assert!(!result.sections.contains_key("/products"));
    assert!(!result.sections.contains_key("/privacy"));
}
