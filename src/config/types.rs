use serde::{Deserialize, Serialize};

/// Main configuration structure for Site-Gleaner
///
/// Every section may be omitted; missing sections fall back to the defaults
/// below, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub filters: FilterConfig,
    pub extractor: ExtractorConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub renderer: RendererConfig,
}

/// Crawl budget configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of link levels fetched, counting the start URL as level 1
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of pages kept in the result
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Number of concurrent workers
    pub concurrency: usize,

    /// Navigation timeout per page (milliseconds)
    #[serde(rename = "page-timeout-ms")]
    pub page_timeout_ms: u64,

    /// Wall-clock budget for the whole crawl (milliseconds)
    #[serde(rename = "total-timeout-ms")]
    pub total_timeout_ms: u64,

    /// How long a worker waits on an empty frontier before exiting (milliseconds)
    #[serde(rename = "idle-timeout-ms")]
    pub idle_timeout_ms: u64,

    /// Visited registry capacity, as a multiple of `max-pages`
    #[serde(rename = "visited-multiplier")]
    pub visited_multiplier: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_pages: 25,
            concurrency: 5,
            page_timeout_ms: 15_000,
            total_timeout_ms: 45_000,
            idle_timeout_ms: 3_000,
            visited_multiplier: 5,
        }
    }
}

/// Link relevance and priority rules
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Path substrings that make a link irrelevant
    #[serde(rename = "ignore-path-keywords")]
    pub ignore_path_keywords: Vec<String>,

    /// Path substrings that raise a link to the keyword priority band
    #[serde(rename = "priority-path-keywords")]
    pub priority_path_keywords: Vec<String>,

    /// Href prefixes (schemes and file extensions) that make a link irrelevant
    #[serde(rename = "ignore-prefixes")]
    pub ignore_prefixes: Vec<String>,

    /// Regex matched against the lowercase path; a match marks auto-generated pages
    #[serde(rename = "noise-pattern")]
    pub noise_pattern: String,

    /// Regex recognising a language-code path prefix such as `/en/` or `/pt-BR/`
    #[serde(rename = "language-prefix-pattern")]
    pub language_prefix_pattern: String,

    /// Whether links under a language-code prefix are skipped
    #[serde(rename = "skip-language-prefixes")]
    pub skip_language_prefixes: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ignore_path_keywords: strings(&[
                "privacy",
                "legal",
                "terms",
                "cookie",
                "contact",
                "support",
                "security",
                "accessibility",
                "login",
                "account",
                "shop",
                "cart",
                "forum",
                "download",
                "driver",
                "events",
            ]),
            priority_path_keywords: strings(&[
                "about",
                "solution",
                "product",
                "industry",
                "enterprise",
                "company",
                "news",
                "press",
                "blog",
                "investor",
                "career",
                "platform",
                "who-we-are",
                "about us",
            ]),
            ignore_prefixes: strings(&[
                ".pdf",
                ".zip",
                ".jpg",
                ".png",
                ".svg",
                ".css",
                ".js",
                ".xml",
                ".rss",
                "mailto:",
                "tel:",
                "javascript:",
            ]),
            noise_pattern: r"/(catalogue|item|product|page-)/|\d{4,}".to_string(),
            language_prefix_pattern: r"^/([a-z]{2}(-[a-zA-Z]{2})?)/".to_string(),
            skip_language_prefixes: false,
        }
    }
}

/// Content extraction rules
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum characters kept per page
    #[serde(rename = "max-text-chars")]
    pub max_text_chars: usize,

    /// Elements removed before text is read (header, footer, navigation...)
    #[serde(rename = "chrome-selectors")]
    pub chrome_selectors: Vec<String>,

    /// Primary content containers, tried in order
    #[serde(rename = "content-selectors")]
    pub content_selectors: Vec<String>,

    /// Phrase marking an error page (matched case-insensitively)
    #[serde(rename = "not-found-marker")]
    pub not_found_marker: String,

    /// Pages shorter than this that contain the marker are discarded
    #[serde(rename = "not-found-max-chars")]
    pub not_found_max_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_text_chars: 8_000,
            chrome_selectors: strings(&["header", "footer", "nav", "aside", "script", "style"]),
            content_selectors: strings(&[
                "main",
                "article",
                ".main-content",
                ".content",
                "#main",
                "#content",
            ]),
            not_found_marker: "page not found".to_string(),
            not_found_max_chars: 150,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ColetteBot".to_string(),
            crawler_version: "1.4".to_string(),
            contact_url: "https://example.com/bot-info".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Which page renderer drives the crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Plain HTTP fetch plus static HTML processing
    #[default]
    Static,
    /// Headless Chromium (requires the `chrome` feature)
    Chrome,
}

/// Renderer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RendererConfig {
    pub kind: RendererKind,

    /// Run the browser without a window (chrome renderer only)
    pub headless: bool,

    /// Bytes of a response body read before the rest is dropped (static renderer only)
    #[serde(rename = "max-body-bytes")]
    pub max_body_bytes: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kind: RendererKind::Static,
            headless: true,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
