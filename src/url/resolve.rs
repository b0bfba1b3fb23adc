use crate::config::FilterConfig;
use crate::UrlError;
use url::Url;

/// Href prefixes that never point at a fetchable resource
const REJECTED_PREFIXES: &[&str] = &["mailto:", "tel:", "javascript:", "#"];

/// Resolves hrefs found on a page into absolute URLs
///
/// Besides standard relative resolution, the resolver applies a policy
/// filter: hrefs containing any of the configured excluded path segments
/// (for example a CDN's e-mail obfuscation redirect) are rejected.
#[derive(Debug, Clone, Default)]
pub struct LinkResolver {
    excluded_segments: Vec<String>,
}

impl LinkResolver {
    /// Creates a resolver with the given excluded path segments
    pub fn new(excluded_segments: Vec<String>) -> Self {
        Self { excluded_segments }
    }

    /// Creates a resolver from the filter section of the configuration
    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.excluded_path_segments.clone())
    }

    /// Resolves `href` against the page URL `base_url`
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - Absolute HTTP(S) URL
    /// * `Err(UrlError::Rejected)` - Non-navigable or excluded href
    /// * `Err(UrlError::Parse)` - Base or resolved URL is malformed
    ///
    /// # Examples
    ///
    /// ```
    /// use dead_link_checker::url::LinkResolver;
    ///
    /// let resolver = LinkResolver::default();
    /// let url = resolver
    ///     .resolve("https://example.com/base/index.html", "../about")
    ///     .unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/about");
    /// ```
    pub fn resolve(&self, base_url: &str, href: &str) -> Result<Url, UrlError> {
        let base = Url::parse(base_url).map_err(|e| UrlError::Parse(e.to_string()))?;
        self.resolve_against(&base, href)
    }

    /// Resolves `href` against an already parsed page URL
    pub fn resolve_against(&self, base: &Url, href: &str) -> Result<Url, UrlError> {
        let href = href.trim();

        if href.is_empty() {
            return Err(UrlError::Rejected("empty href".to_string()));
        }

        if let Some(prefix) = REJECTED_PREFIXES
            .iter()
            .find(|prefix| has_prefix_ignore_case(href, prefix))
        {
            return Err(UrlError::Rejected(format!("{} link", prefix)));
        }

        if let Some(segment) = self
            .excluded_segments
            .iter()
            .find(|segment| href.contains(segment.as_str()))
        {
            return Err(UrlError::Rejected(format!("excluded segment {}", segment)));
        }

        let resolved = base.join(href).map_err(|e| UrlError::Parse(e.to_string()))?;

        // Only accept HTTP and HTTPS URLs
        match resolved.scheme() {
            "http" | "https" => Ok(resolved),
            other => Err(UrlError::InvalidScheme(other.to_string())),
        }
    }
}

fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
