//! Crawler module for page fetching and link checking
//!
//! This module contains the core crawling logic, including:
//! - The shared frontier of pages and claimed links
//! - HTTP fetching of pages and status probing of links
//! - HTML parsing and link extraction
//! - Worker pool coordination and result collection

mod aggregator;
mod checker;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use aggregator::{CrawlResult, CrawlSummary, LinkObservation, ResultAggregator};
pub use checker::{is_ok_status, HttpStatusChecker, StatusChecker};
pub use coordinator::{Coordinator, CrawlProgress, ProgressHandle};
pub use fetcher::{
    build_http_client, fetch_url, is_html_content_type, FetchResult, HttpFetcher, PageFetcher,
};
pub use frontier::{Frontier, FrontierStats};
pub use parser::{
    truncate_text, AnchorElement, ExtractedLinks, HtmlDocument, LinkExtractor, OutgoingLink,
    ParsedDocument, MAX_TEXT_CHARS,
};

use crate::config::Config;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and seed URL
/// 2. Build the HTTP client
/// 3. Crawl every reachable page on the seed's host
/// 4. Probe every link found on those pages
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `start_url` - The seed page
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Crawl completed; broken links are part of the result
/// * `Err(CrawlError)` - Crawl could not start or hit a fatal error
pub async fn crawl(config: Config, start_url: &str) -> Result<CrawlResult, CrawlError> {
    Coordinator::new(config, start_url)?.run().await
}
