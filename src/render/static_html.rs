//! HTTP renderer for server-rendered sites
//!
//! Fetches pages with a plain GET and processes them with `scraper`. No
//! JavaScript runs, so client-rendered sites yield little text; use the
//! chrome renderer for those.

use crate::config::UserAgentConfig;
use crate::crawler::ExtractionRules;
use crate::render::{html, AnchorLink, RenderError, RenderedPage, Renderer};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Body size limit used unless the configuration sets one
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_gleaner::config::UserAgentConfig;
/// use site_gleaner::render::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    connect_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(connect_timeout)
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renderer backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct StaticRenderer {
    client: Client,
    max_body_bytes: usize,
}

impl StaticRenderer {
    pub fn new(user_agent: &UserAgentConfig, connect_timeout: Duration) -> Result<Self, RenderError> {
        Ok(Self::with_client(build_http_client(
            user_agent,
            connect_timeout,
        )?))
    }

    /// Wraps an already configured client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Caps how much of each response body is read
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

#[async_trait]
impl Renderer for StaticRenderer {
    async fn open_page(&self) -> Result<Box<dyn RenderedPage>, RenderError> {
        Ok(Box::new(StaticPage {
            client: self.client.clone(),
            max_body_bytes: self.max_body_bytes,
            body: None,
        }))
    }
}

/// The last document fetched by one worker
struct StaticPage {
    client: Client,
    max_body_bytes: usize,
    body: Option<String>,
}

impl StaticPage {
    async fn fetch(&self, url: &Url) -> Result<String, RenderError> {
        let mut response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default().to_lowercase();
            if !content_type.contains("html") {
                return Err(RenderError::Navigation {
                    url: url.to_string(),
                    message: format!("Expected HTML, got {}", content_type),
                });
            }
        }

        // Only the first `max_body_bytes` are kept; the text is truncated
        // far below that anyway.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = self.max_body_bytes - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                debug!("Body of {} cut at {} bytes", url, self.max_body_bytes);
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn body(&self) -> Result<&str, RenderError> {
        self.body.as_deref().ok_or(RenderError::NoPage)
    }
}

#[async_trait]
impl RenderedPage for StaticPage {
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<(), RenderError> {
        self.body = None;

        let body = tokio::time::timeout(timeout, self.fetch(url))
            .await
            .map_err(|_| RenderError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis(),
            })??;

        self.body = Some(body);
        Ok(())
    }

    async fn extract_main_text(&mut self, rules: &ExtractionRules) -> Result<String, RenderError> {
        Ok(html::main_text(self.body()?, rules))
    }

    async fn extract_links(&mut self) -> Result<Vec<AnchorLink>, RenderError> {
        Ok(html::anchors(self.body()?))
    }

    async fn close(&mut self) {
        self.body = None;
    }
}
