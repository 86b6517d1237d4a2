use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_gleaner::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the network location of a URL: the lowercase host plus the port
/// when one is given explicitly
///
/// Two links belong to the same site when their authorities are equal, so
/// `example.com:8080` and `example.com` are different sites.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_gleaner::url::authority;
///
/// let url = Url::parse("http://127.0.0.1:9000/x").unwrap();
/// assert_eq!(authority(&url), Some("127.0.0.1:9000".to_string()));
///
/// let url = Url::parse("https://example.com:443/").unwrap();
/// assert_eq!(authority(&url), Some("example.com".to_string()));
/// ```
pub fn authority(url: &Url) -> Option<String> {
    let host = extract_domain(url).filter(|h| !h.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}
