use url::Url;

/// Extracts the lowercase hostname from a URL
///
/// Ports are not part of the hostname, so `example.com:8080` and
/// `example.com` share a domain.
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(str::to_ascii_lowercase)
}

/// Returns true if the URL's hostname equals the crawl's base domain
///
/// Exact comparison: `blog.example.com` is external to `example.com`.
pub fn is_internal(url: &Url, base_domain: &str) -> bool {
    extract_domain(url).is_some_and(|domain| domain == base_domain)
}
