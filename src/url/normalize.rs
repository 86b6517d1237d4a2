use crate::url::domain::authority;
use crate::{UrlError, UrlResult};
use url::Url;

/// List of tracking query parameters to remove during normalization
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid", "ref", "source"];

/// The parsed starting point of a crawl session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUrl {
    /// `scheme://host[:port]`
    pub base_url: String,

    /// `host[:port]`, compared against every candidate link
    pub base_host: String,

    /// The first page to fetch
    pub start_url: Url,
}

/// Parses the domain handed to a crawl into its seed URLs
///
/// A domain without a scheme gets `https://` prepended. The start URL keeps the path of
/// the input (so `example.com/docs` starts at `/docs`) but drops any query
/// or fragment.
///
/// # Examples
///
/// ```
/// use site_gleaner::url::parse_seed;
///
/// let seed = parse_seed("Example.com").unwrap();
/// assert_eq!(seed.base_url, "https://example.com");
/// assert_eq!(seed.base_host, "example.com");
/// assert_eq!(seed.start_url.as_str(), "https://example.com/");
/// ```
pub fn parse_seed(domain: &str) -> UrlResult<SeedUrl> {
    let trimmed = domain.trim();
    let lowered = trimmed.to_ascii_lowercase();
    let candidate = if lowered.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let base_host = authority(&url).ok_or(UrlError::MissingDomain)?;
    let base_url = format!("{}://{}", url.scheme(), base_host);

    url.set_query(None);
    url.set_fragment(None);

    Ok(SeedUrl {
        base_url,
        base_host,
        start_url: url,
    })
}

/// Normalizes a URL for deduplication
///
/// # Normalization Steps
///
/// 1. Remove fragment (everything after #)
/// 2. Remove tracking query parameters (`utm_*`, `fbclid`, ...)
/// 3. Sort remaining query parameters alphabetically
/// 4. Remove empty query string (trailing ?)
///
/// Host lowercasing, default-port removal and dot-segment removal are
/// already performed by the URL parser.
pub fn normalize_url(mut url: Url) -> Url {
    url.set_fragment(None);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);
        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    url
}

/// Resolves a link href against the page it was found on
///
/// Returns None for hrefs that do not resolve to an http(s) URL.
pub fn resolve_link(page_url: &Url, href: &str) -> Option<Url> {
    let absolute = page_url.join(href.trim()).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    Some(normalize_url(absolute))
}

/// Returns the result-store key for a URL: its path, or `/` when empty
pub fn path_key(url: &Url) -> String {
    match url.path() {
        "" => "/".to_string(),
        path => path.to_string(),
    }
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
