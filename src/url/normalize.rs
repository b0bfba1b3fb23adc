use crate::UrlError;
use serde::Serialize;
use std::fmt;
use url::Url;

const INDEX_DOCUMENT: &str = "index.html";

/// Canonical comparison key for a page URL
///
/// Only produced by [`normalize_url`] / [`normalize_parsed`], so every value
/// is already in canonical form and re-normalizing it is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the canonical form back into a `Url`
    pub fn to_url(&self) -> Result<Url, UrlError> {
        Url::parse(&self.0).map_err(|e| UrlError::Parse(e.to_string()))
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes a URL string into its canonical comparison key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Remove fragment (everything after #)
/// 3. Collapse a trailing `/index.html` to its directory
/// 4. Remove trailing slash (except for root /)
///
/// Steps 3 and 4 repeat until neither applies, which keeps the function
/// idempotent for paths such as `/docs/index.html/`.
///
/// # Examples
///
/// ```
/// use dead_link_checker::url::normalize_url;
///
/// let url = normalize_url("https://example.com/blog/index.html#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/blog");
/// ```
pub fn normalize_url(url_str: &str) -> Result<NormalizedUrl, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    Ok(normalize_parsed(url))
}

/// Normalizes an already parsed URL
pub fn normalize_parsed(mut url: Url) -> NormalizedUrl {
    url.set_fragment(None);

    if let Some(path) = normalize_path(url.path()) {
        url.set_path(&path);
    }

    NormalizedUrl(url.into())
}

/// Returns the rewritten path, or None when the path is already canonical
fn normalize_path(path: &str) -> Option<String> {
    let mut normalized = path.to_string();

    loop {
        if normalized.ends_with(&format!("/{}", INDEX_DOCUMENT)) {
            normalized.truncate(normalized.len() - INDEX_DOCUMENT.len());
        } else if normalized.len() > 1 && normalized.ends_with('/') {
            normalized.pop();
        } else {
            break;
        }
    }

    (normalized != path).then_some(normalized)
}
