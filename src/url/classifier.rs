//! Link relevance filtering and priority scoring
//!
//! Both checks are pure: they read only their arguments and the rules the
//! classifier was built with, so the same href always gets the same answer.

use crate::config::FilterConfig;
use crate::url::domain::authority;
use crate::ConfigError;
use regex::Regex;
use url::{ParseError, Url};

/// Band for links found inside a navigation element (and for the seed)
pub const NAV_PRIORITY: u8 = 3;
/// Band for links whose path contains a priority keyword
pub const KEYWORD_PRIORITY: u8 = 2;
/// Band for the homepage
pub const HOMEPAGE_PRIORITY: u8 = 1;
/// Band for everything else
pub const DEFAULT_PRIORITY: u8 = 0;

/// Why a link was judged irrelevant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    FragmentOnly,
    IgnoredPrefix,
    IgnoredExtension,
    UnsupportedScheme,
    Malformed,
    ForeignHost,
    IgnoredKeyword,
    NoisePath,
    LanguagePrefix,
}

/// The parts of an href the filters look at
struct HrefParts {
    /// `host[:port]` for absolute and protocol-relative hrefs
    authority: Option<String>,
    /// Lowercase path, without query or fragment
    path: String,
}

/// Decides which links are worth following and in which order
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    ignore_keywords: Vec<String>,
    priority_keywords: Vec<String>,
    ignore_prefixes: Vec<String>,
    noise: Regex,
    language_prefix: Option<Regex>,
}

impl LinkClassifier {
    /// Builds a classifier from the filter configuration, compiling its patterns
    pub fn from_config(config: &FilterConfig) -> Result<Self, ConfigError> {
        let noise = Regex::new(&config.noise_pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("noise_pattern: {}", e)))?;

        let language_prefix = if config.skip_language_prefixes {
            Some(Regex::new(&config.language_prefix_pattern).map_err(|e| {
                ConfigError::InvalidPattern(format!("language_prefix_pattern: {}", e))
            })?)
        } else {
            None
        };

        Ok(Self {
            ignore_keywords: lowercase_all(&config.ignore_path_keywords),
            priority_keywords: lowercase_all(&config.priority_path_keywords),
            ignore_prefixes: lowercase_all(&config.ignore_prefixes),
            noise,
            language_prefix,
        })
    }

    /// Returns true if the href should be followed
    ///
    /// # Examples
    ///
    /// ```
    /// use site_gleaner::config::FilterConfig;
    /// use site_gleaner::url::LinkClassifier;
    ///
    /// let classifier = LinkClassifier::from_config(&FilterConfig::default()).unwrap();
    /// assert!(classifier.is_relevant("/about", "example.com"));
    /// assert!(!classifier.is_relevant("/legal", "example.com"));
    /// assert!(!classifier.is_relevant("https://other.com/about", "example.com"));
    /// ```
    pub fn is_relevant(&self, href: &str, base_host: &str) -> bool {
        self.rejection(href, base_host).is_none()
    }

    /// Returns the first filter that rejects the href, or None if it is relevant
    pub fn rejection(&self, href: &str, base_host: &str) -> Option<Rejection> {
        let href = href.trim();
        if href.is_empty() {
            return Some(Rejection::Empty);
        }
        if href.starts_with('#') {
            return Some(Rejection::FragmentOnly);
        }

        let lowered = href.to_lowercase();
        if self.ignore_prefixes.iter().any(|p| lowered.starts_with(p)) {
            return Some(Rejection::IgnoredPrefix);
        }

        let parts = match split_href(href) {
            Ok(parts) => parts,
            Err(rejection) => return Some(rejection),
        };

        if self
            .ignore_prefixes
            .iter()
            .filter(|p| p.starts_with('.'))
            .any(|ext| parts.path.ends_with(ext.as_str()))
        {
            return Some(Rejection::IgnoredExtension);
        }

        if let Some(host) = &parts.authority {
            if !host.eq_ignore_ascii_case(base_host) {
                return Some(Rejection::ForeignHost);
            }
        }

        if self
            .ignore_keywords
            .iter()
            .any(|keyword| parts.path.contains(keyword.as_str()))
        {
            return Some(Rejection::IgnoredKeyword);
        }

        if self.noise.is_match(&parts.path) {
            return Some(Rejection::NoisePath);
        }

        if let Some(language) = &self.language_prefix {
            if language.is_match(&parts.path) {
                return Some(Rejection::LanguagePrefix);
            }
        }

        None
    }

    /// Scores a path into a priority band, without the navigation boost
    ///
    /// # Examples
    ///
    /// ```
    /// use site_gleaner::config::FilterConfig;
    /// use site_gleaner::url::LinkClassifier;
    ///
    /// let classifier = LinkClassifier::from_config(&FilterConfig::default()).unwrap();
    /// assert_eq!(classifier.priority("/About-Us"), 2);
    /// assert_eq!(classifier.priority("/"), 1);
    /// assert_eq!(classifier.priority("/team"), 0);
    /// ```
    pub fn priority(&self, path: &str) -> u8 {
        let path = path.to_lowercase();
        if self
            .priority_keywords
            .iter()
            .any(|keyword| path.contains(keyword.as_str()))
        {
            return KEYWORD_PRIORITY;
        }
        if path == "/" {
            return HOMEPAGE_PRIORITY;
        }
        DEFAULT_PRIORITY
    }

    /// Scores a path, raising it to the navigation band when any anchor for
    /// the link sat inside a navigation element
    pub fn link_priority(&self, path: &str, in_nav: bool) -> u8 {
        if in_nav {
            NAV_PRIORITY
        } else {
            self.priority(path)
        }
    }
}

/// Splits an href into the pieces the filters inspect
fn split_href(href: &str) -> Result<HrefParts, Rejection> {
    match Url::parse(href) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(Rejection::UnsupportedScheme);
            }
            Ok(HrefParts {
                authority: authority(&url),
                path: url.path().to_lowercase(),
            })
        }
        Err(ParseError::RelativeUrlWithoutBase) if href.starts_with("//") => {
            let url = Url::parse(&format!("https:{}", href)).map_err(|_| Rejection::Malformed)?;
            Ok(HrefParts {
                authority: authority(&url),
                path: url.path().to_lowercase(),
            })
        }
        Err(ParseError::RelativeUrlWithoutBase) => {
            let end = href.find(|c| c == '?' || c == '#').unwrap_or(href.len());
            Ok(HrefParts {
                authority: None,
                path: href[..end].to_lowercase(),
            })
        }
        Err(_) => Err(Rejection::Malformed),
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}
