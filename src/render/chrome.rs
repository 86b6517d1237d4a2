use crate::config::{RendererConfig, UserAgentConfig};
use crate::crawler::ExtractionRules;
use crate::render::{AnchorLink, RenderError, RenderedPage, Renderer};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use url::Url;

/// Lists anchors as loaded, before any chrome is removed
const ANCHOR_SNAPSHOT_JS: &str = "Array.from(document.querySelectorAll('a[href]')).map(e => ({ href: e.getAttribute('href'), inNav: !!e.closest('nav') }))";

/// Headless Chromium renderer; every page is a browser tab
pub struct ChromeRenderer {
    browser: Arc<Browser>,
    user_agent: String,
    handler: JoinHandle<()>,
}

impl ChromeRenderer {
    /// Launches the browser and starts driving its event stream
    pub async fn launch(
        config: &RendererConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, RenderError> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| RenderError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            RenderError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("Browser handler error: {}", e);
                }
            }
        });

        Ok(Self {
            browser: Arc::new(browser),
            user_agent: user_agent.header_value(),
            handler,
        })
    }
}

impl Drop for ChromeRenderer {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn open_page(&self) -> Result<Box<dyn RenderedPage>, RenderError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Browser(format!("Failed to create page: {}", e)))?;

        page.set_user_agent(self.user_agent.as_str())
            .await
            .map_err(|e| RenderError::Browser(format!("Failed to set user agent: {}", e)))?;

        Ok(Box::new(ChromePage {
            page: Some(page),
            anchors: None,
        }))
    }
}

/// A browser tab owned by one worker
///
/// Dropping it without `close` (an aborted worker) closes the tab on a
/// background task.
struct ChromePage {
    page: Option<Page>,
    anchors: Option<Vec<AnchorLink>>,
}

impl ChromePage {
    fn page(&self) -> Result<&Page, RenderError> {
        self.page.as_ref().ok_or(RenderError::NoPage)
    }
}

#[async_trait]
impl RenderedPage for ChromePage {
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<(), RenderError> {
        self.anchors = None;
        let page = self.page()?;

        tokio::time::timeout(timeout, page.goto(url.as_str()))
            .await
            .map_err(|_| RenderError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis(),
            })?
            .map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let anchors: Vec<AnchorLink> = page
            .evaluate(ANCHOR_SNAPSHOT_JS)
            .await
            .map_err(|e| RenderError::Extraction(format!("Anchor script failed: {}", e)))?
            .into_value()
            .map_err(|e| RenderError::Extraction(format!("Failed to parse anchors: {:?}", e)))?;

        self.anchors = Some(anchors);
        Ok(())
    }

    async fn extract_main_text(&mut self, rules: &ExtractionRules) -> Result<String, RenderError> {
        let script = main_text_script(rules)?;
        let text: String = self
            .page()?
            .evaluate(script)
            .await
            .map_err(|e| RenderError::Extraction(format!("Text script failed: {}", e)))?
            .into_value()
            .map_err(|e| RenderError::Extraction(format!("Failed to parse text: {:?}", e)))?;
        Ok(text)
    }

    async fn extract_links(&mut self) -> Result<Vec<AnchorLink>, RenderError> {
        self.anchors.clone().ok_or(RenderError::NoPage)
    }

    async fn close(&mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                tracing::debug!("Failed to close browser page: {}", e);
            }
        }
    }
}

impl Drop for ChromePage {
    fn drop(&mut self) {
        if let Some(page) = self.page.take() {
            if let Ok(handle) = Handle::try_current() {
                handle.spawn(async move {
                    let _ = page.close().await;
                });
            }
        }
    }
}

/// Builds the in-page script that strips chrome and reads the primary text
fn main_text_script(rules: &ExtractionRules) -> Result<String, RenderError> {
    let chrome = serde_json::to_string(&rules.chrome_selectors)
        .map_err(|e| RenderError::Extraction(e.to_string()))?;
    let containers = serde_json::to_string(&rules.content_selectors)
        .map_err(|e| RenderError::Extraction(e.to_string()))?;

    Ok(format!(
        r#"(() => {{
    for (const sel of {chrome}) {{
        document.querySelectorAll(sel).forEach(el => el.remove());
    }}
    let root = null;
    for (const sel of {containers}) {{
        root = document.querySelector(sel);
        if (root) break;
    }}
    root = root || document.body;
    return root ? root.innerText || '' : '';
}})()"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_text_script_embeds_selectors() {
        let script = main_text_script(&ExtractionRules::default()).unwrap();
        assert!(script.contains(r#"["header","footer","nav","aside","script","style"]"#));
        assert!(script.contains(r##""#content""##));
        assert!(script.starts_with("(() => {"));
    }
}
