//! Page rendering backends
//!
//! A [`Renderer`] hands out [`RenderedPage`]s; each crawl worker opens one
//! page and reuses it for every URL it visits. Two backends exist:
//!
//! - [`StaticRenderer`]: plain HTTP GET plus `scraper` DOM processing (default)
//! - `ChromeRenderer`: a headless browser via `chromiumoxide` (feature `chrome`)

#[cfg(feature = "chrome")]
mod chrome;
mod html;
mod static_html;

#[cfg(feature = "chrome")]
pub use chrome::ChromeRenderer;
pub use html::{anchors, main_text};
pub use static_html::{build_http_client, StaticRenderer};

use crate::config::{Config, RendererKind};
use crate::crawler::ExtractionRules;
use crate::GleanError;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// An anchor found on a rendered page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnchorLink {
    /// The raw `href` attribute, as written in the page
    pub href: String,

    /// True when the anchor sits inside a `<nav>` element
    #[serde(rename = "inNav")]
    pub in_nav: bool,
}

impl AnchorLink {
    pub fn new(href: impl Into<String>, in_nav: bool) -> Self {
        Self {
            href: href.into(),
            in_nav,
        }
    }
}

/// Errors raised by a renderer or one of its pages
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Navigation to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u128 },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("No page has been loaded yet")]
    NoPage,

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Source of pages for the worker pool
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Opens a fresh page; the caller owns it until `close`
    async fn open_page(&self) -> Result<Box<dyn RenderedPage>, RenderError>;
}

/// One renderable page, reused across navigations by a single worker
///
/// Implementations release their resources on drop, so an aborted worker
/// never leaks a page even though it never reaches `close`.
#[async_trait]
pub trait RenderedPage: Send {
    /// Loads `url`, failing with [`RenderError::Timeout`] after `timeout`
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<(), RenderError>;

    /// Returns the visible text of the page's primary content
    ///
    /// Chrome elements are left out and the first matching content
    /// container is preferred over the whole body.
    async fn extract_main_text(&mut self, rules: &ExtractionRules) -> Result<String, RenderError>;

    /// Returns every anchor of the page as loaded, in document order
    async fn extract_links(&mut self) -> Result<Vec<AnchorLink>, RenderError>;

    /// Releases the page
    async fn close(&mut self);
}

/// Builds the renderer selected by the configuration
pub async fn build_renderer(config: &Config) -> Result<Arc<dyn Renderer>, GleanError> {
    match config.renderer.kind {
        RendererKind::Static => {
            let connect_timeout = Duration::from_millis(config.crawler.page_timeout_ms);
            let renderer = StaticRenderer::new(&config.user_agent, connect_timeout)?
                .with_max_body_bytes(config.renderer.max_body_bytes);
            Ok(Arc::new(renderer))
        }
        #[cfg(feature = "chrome")]
        RendererKind::Chrome => {
            let renderer = ChromeRenderer::launch(&config.renderer, &config.user_agent).await?;
            Ok(Arc::new(renderer))
        }
        #[cfg(not(feature = "chrome"))]
        RendererKind::Chrome => Err(crate::ConfigError::Validation(
            "renderer kind 'chrome' requires building with the 'chrome' feature".to_string(),
        )
        .into()),
    }
}
