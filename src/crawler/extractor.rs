//! Text extraction rules applied to every rendered page
//!
//! The renderer is responsible for finding the primary text of a page (it
//! knows how to strip navigation chrome in its own document model); the
//! rules here decide what to do with that raw text: whitespace collapsing,
//! soft-failure detection and truncation.

use crate::config::ExtractorConfig;

/// Outcome of running the extraction rules over a page's raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Cleaned and truncated text worth storing
    Content(String),

    /// The page rendered but should not be stored (empty or an error page)
    SoftFailure,
}

/// Extraction settings shared by every worker of a session
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    /// CSS selectors for elements removed before reading text
    pub chrome_selectors: Vec<String>,

    /// CSS selectors tried in order for the primary content container
    pub content_selectors: Vec<String>,

    /// Maximum number of characters kept per page
    pub max_text_chars: usize,

    /// Lowercase marker identifying error pages
    pub not_found_marker: String,

    /// Texts shorter than this that contain the marker are soft failures
    pub not_found_max_chars: usize,
}

impl ExtractionRules {
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self {
            chrome_selectors: config.chrome_selectors.clone(),
            content_selectors: config.content_selectors.clone(),
            max_text_chars: config.max_text_chars,
            not_found_marker: config.not_found_marker.to_lowercase(),
            not_found_max_chars: config.not_found_max_chars,
        }
    }

    /// Turns raw page text into an [`Extraction`]
    ///
    /// Whitespace runs collapse to a single space. Empty text is a soft
    /// failure, as is short text containing the not-found marker (compared
    /// case-insensitively). Anything else is truncated to `max_text_chars`
    /// characters.
    pub fn finish(&self, raw: &str) -> Extraction {
        let text = clean_text(raw);
        if text.is_empty() {
            return Extraction::SoftFailure;
        }

        if self.looks_like_error_page(&text) {
            return Extraction::SoftFailure;
        }

        Extraction::Content(truncate_chars(text, self.max_text_chars))
    }

    fn looks_like_error_page(&self, text: &str) -> bool {
        if self.not_found_marker.is_empty() {
            return false;
        }
        text.chars().count() < self.not_found_max_chars
            && text.to_lowercase().contains(&self.not_found_marker)
    }
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

/// Collapses every run of whitespace to one space and trims the ends
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}
