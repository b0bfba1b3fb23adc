//! HTML link extraction
//!
//! Pages are parsed with `scraper`. Extraction reads every `<a href>` on a
//! page, resolves it against the page URL, and splits the results into
//! internal pages to crawl and outgoing links to probe. Every resolvable
//! link is probed, internal ones included, so broken links inside the site
//! are reported too.
//!
//! `scraper::Html` is not `Send`, so parsing is synchronous and the parsed
//! document never outlives a single call.

use crate::url::{is_internal, LinkResolver};
use scraper::{ElementRef, Html, Selector};
use tracing::trace;
use url::Url;

/// Anchor text longer than this is truncated
pub const MAX_TEXT_CHARS: usize = 50;

/// Characters kept from truncated anchor text before the ellipsis
const TRUNCATED_TEXT_CHARS: usize = 47;

const ELLIPSIS: &str = "...";

/// An anchor element of a parsed document
pub trait AnchorElement {
    /// Returns the value of an attribute, if present
    fn attr(&self, name: &str) -> Option<&str>;

    /// Returns the trimmed text content
    fn text(&self) -> String;
}

/// A parsed page that exposes its anchors
pub trait ParsedDocument {
    /// Returns every anchor carrying an `href` attribute, in document order
    fn anchors(&self) -> Vec<Box<dyn AnchorElement + '_>>;
}

/// HTML document parsed with `scraper`
pub struct HtmlDocument {
    document: Html,
}

impl HtmlDocument {
    /// Parses an HTML document; malformed markup is repaired, never rejected
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }
}

impl ParsedDocument for HtmlDocument {
    fn anchors(&self) -> Vec<Box<dyn AnchorElement + '_>> {
        let mut anchors: Vec<Box<dyn AnchorElement + '_>> = Vec::new();

        if let Ok(selector) = Selector::parse("a[href]") {
            for element in self.document.select(&selector) {
                anchors.push(Box::new(ScraperAnchor(element)));
            }
        }

        anchors
    }
}

struct ScraperAnchor<'a>(ElementRef<'a>);

impl AnchorElement for ScraperAnchor<'_> {
    fn attr(&self, name: &str) -> Option<&str> {
        self.0.value().attr(name)
    }

    fn text(&self) -> String {
        self.0.text().collect::<String>().trim().to_string()
    }
}

/// A resolved link found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingLink {
    /// Absolute URL, fragment kept
    pub href: String,

    /// Anchor text, truncated
    pub text: String,
}

/// Links extracted from one page
#[derive(Debug, Clone, Default)]
pub struct ExtractedLinks {
    /// Links on the crawl domain, to be enqueued as pages
    pub internal: Vec<Url>,

    /// Every resolvable link, to be probed
    pub outgoing: Vec<OutgoingLink>,
}

/// Extracts and classifies the links of a page
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    base_domain: String,
    resolver: LinkResolver,
}

impl LinkExtractor {
    /// Creates an extractor for the site whose host is `base_domain`
    pub fn new(base_domain: impl Into<String>, resolver: LinkResolver) -> Self {
        Self {
            base_domain: base_domain.into().to_lowercase(),
            resolver,
        }
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Parses `html` and extracts its links
    ///
    /// # Arguments
    ///
    /// * `page_url` - URL the page was fetched from; relative links resolve against it
    /// * `html` - The page body
    ///
    /// # Example
    ///
    /// ```
    /// use dead_link_checker::crawler::LinkExtractor;
    /// use dead_link_checker::LinkResolver;
    ///
    /// let extractor = LinkExtractor::new("example.com", LinkResolver::default());
    /// let html = r#"<a href="/about">About</a><a href="https://other.org/">Other</a>"#;
    /// let links = extractor.extract("https://example.com/", html);
    ///
    /// assert_eq!(links.internal.len(), 1);
    /// assert_eq!(links.outgoing.len(), 2);
    /// ```
    pub fn extract(&self, page_url: &str, html: &str) -> ExtractedLinks {
        let document = HtmlDocument::parse(html);
        self.extract_from(page_url, &document)
    }

    /// Extracts links from an already parsed document
    pub fn extract_from(&self, page_url: &str, document: &dyn ParsedDocument) -> ExtractedLinks {
        let mut links = ExtractedLinks::default();

        let base = match Url::parse(page_url) {
            Ok(base) => base,
            Err(e) => {
                trace!("Cannot resolve links against {}: {}", page_url, e);
                return links;
            }
        };

        for anchor in document.anchors() {
            let Some(raw_href) = anchor.attr("href") else {
                continue;
            };

            let resolved = match self.resolver.resolve_against(&base, raw_href) {
                Ok(url) => url,
                Err(e) => {
                    trace!("Skipping link {:?} on {}: {}", raw_href, page_url, e);
                    continue;
                }
            };

            if is_internal(&resolved, &self.base_domain) {
                links.internal.push(resolved.clone());
            }

            links.outgoing.push(OutgoingLink {
                href: resolved.into(),
                text: truncate_text(&anchor.text()),
            });
        }

        links
    }
}

/// Trims anchor text and truncates it to at most [`MAX_TEXT_CHARS`] characters
pub fn truncate_text(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= MAX_TEXT_CHARS {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(TRUNCATED_TEXT_CHARS).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
