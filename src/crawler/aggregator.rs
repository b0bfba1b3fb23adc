//! Collection of link observations
//!
//! Workers record one observation per probed link (and one per page that
//! could not be fetched). The aggregator only appends; deduplication happens
//! upstream when links are claimed in the frontier.

use super::checker::is_ok_status;
use crate::url::NormalizedUrl;
use crate::CrawlError;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Result of probing one link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkObservation {
    /// Page the link was found on
    pub source: NormalizedUrl,

    /// Absolute URL of the link
    pub href: String,

    /// Anchor text, truncated
    pub text: String,

    /// Final HTTP status, `None` when no response was obtained
    pub status: Option<u16>,

    /// True iff `status` is in `[100, 400)`
    pub ok: bool,
}

impl LinkObservation {
    /// Creates an observation; `ok` is derived from `status`
    pub fn new(
        source: NormalizedUrl,
        href: impl Into<String>,
        text: impl Into<String>,
        status: Option<u16>,
    ) -> Self {
        Self {
            source,
            href: href.into(),
            text: text.into(),
            status,
            ok: is_ok_status(status),
        }
    }

    /// Observation for a page whose own fetch failed
    pub fn fetch_failed(page: &NormalizedUrl) -> Self {
        Self::new(page.clone(), page.as_str(), "", None)
    }
}

/// Counters printed at the end of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages_crawled: usize,
    pub links_checked: usize,
    pub broken_links: usize,
    pub elapsed: Duration,
}

/// Outcome of a crawl
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// Every page enqueued during the crawl
    pub visited_pages: BTreeSet<NormalizedUrl>,

    /// Observations in the order they were recorded
    pub observations: Vec<LinkObservation>,

    /// Wall time from crawl start to finish
    pub elapsed: Duration,

    /// True if the crawl was cancelled before the frontier drained
    pub interrupted: bool,
}

impl CrawlResult {
    pub fn pages_visited(&self) -> usize {
        self.visited_pages.len()
    }

    pub fn links_checked(&self) -> usize {
        self.observations.len()
    }

    pub fn broken_links(&self) -> impl Iterator<Item = &LinkObservation> {
        self.observations.iter().filter(|o| !o.ok)
    }

    pub fn broken_count(&self) -> usize {
        self.broken_links().count()
    }

    pub fn summary(&self) -> CrawlSummary {
        CrawlSummary {
            pages_crawled: self.pages_visited(),
            links_checked: self.links_checked(),
            broken_links: self.broken_count(),
            elapsed: self.elapsed,
        }
    }
}

/// Thread-safe, append-only store of observations
#[derive(Debug)]
pub struct ResultAggregator {
    observations: Mutex<Vec<LinkObservation>>,
    started_at: Instant,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultAggregator {
    /// Creates an empty aggregator; the crawl clock starts now
    pub fn new() -> Self {
        Self {
            observations: Mutex::new(Vec::new()),
            started_at: Instant::now(),
        }
    }

    /// Appends an observation
    pub fn record(&self, observation: LinkObservation) -> Result<(), CrawlError> {
        self.observations
            .lock()
            .map_err(|_| CrawlError::StatePoisoned)?
            .push(observation);
        Ok(())
    }

    /// Number of observations recorded so far
    pub fn len(&self) -> Result<usize, CrawlError> {
        Ok(self
            .observations
            .lock()
            .map_err(|_| CrawlError::StatePoisoned)?
            .len())
    }

    pub fn is_empty(&self) -> Result<bool, CrawlError> {
        Ok(self.len()? == 0)
    }

    /// Time since the aggregator was created
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Drains the observations into the final result
    pub fn finish(
        &self,
        visited_pages: BTreeSet<NormalizedUrl>,
        interrupted: bool,
    ) -> Result<CrawlResult, CrawlError> {
        let observations = std::mem::take(
            &mut *self
                .observations
                .lock()
                .map_err(|_| CrawlError::StatePoisoned)?,
        );

        Ok(CrawlResult {
            visited_pages,
            observations,
            elapsed: self.elapsed(),
            interrupted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::normalize_url;
    use std::sync::Arc;

    fn source() -> NormalizedUrl {
        normalize_url("https://example.com/").unwrap()
    }

    #[test]
    fn test_observation_ok_follows_status() {
        assert!(LinkObservation::new(source(), "https://a.com/", "", Some(200)).ok);
        assert!(LinkObservation::new(source(), "https://a.com/", "", Some(302)).ok);
        assert!(!LinkObservation::new(source(), "https://a.com/", "", Some(404)).ok);
        assert!(!LinkObservation::new(source(), "https://a.com/", "", None).ok);
    }

    #[test]
    fn test_fetch_failed_observation() {
        let page = normalize_url("https://example.com/missing").unwrap();
        let observation = LinkObservation::fetch_failed(&page);

        assert_eq!(observation.source, page);
        assert_eq!(observation.href, page.as_str());
        assert_eq!(observation.text, "");
        assert_eq!(observation.status, None);
        assert!(!observation.ok);
    }

    #[test]
    fn test_finish_builds_result() {
        let aggregator = ResultAggregator::new();
        aggregator
            .record(LinkObservation::new(source(), "https://a.com/", "A", Some(200)))
            .unwrap();
        aggregator
            .record(LinkObservation::new(source(), "https://b.com/", "B", Some(500)))
            .unwrap();
        aggregator
            .record(LinkObservation::new(source(), "https://c.com/", "C", None))
            .unwrap();
        assert_eq!(aggregator.len().unwrap(), 3);

        let visited: BTreeSet<_> = [source()].into_iter().collect();
        let result = aggregator.finish(visited, false).unwrap();

        assert_eq!(result.pages_visited(), 1);
        assert_eq!(result.links_checked(), 3);
        assert_eq!(result.broken_count(), 2);
        assert!(!result.interrupted);

        let broken: Vec<&str> = result.broken_links().map(|o| o.href.as_str()).collect();
        assert_eq!(broken, vec!["https://b.com/", "https://c.com/"]);

        let summary = result.summary();
        assert_eq!(summary.pages_crawled, 1);
        assert_eq!(summary.links_checked, 3);
        assert_eq!(summary.broken_links, 2);
    }

    #[tokio::test]
    async fn test_concurrent_records_are_all_kept() {
        let aggregator = Arc::new(ResultAggregator::new());

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let aggregator = Arc::clone(&aggregator);
                tokio::spawn(async move {
                    let href = format!("https://example.org/{}", i);
                    aggregator
                        .record(LinkObservation::new(source(), href, "", Some(200)))
                        .unwrap();
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(aggregator.len().unwrap(), 20);
    }

    #[test]
    fn test_observation_serializes_with_report_keys() {
        let observation = LinkObservation::new(source(), "https://a.com/", "A", None);
        let json = serde_json::to_value(&observation).unwrap();

        assert_eq!(json["source"], "https://example.com/");
        assert_eq!(json["href"], "https://a.com/");
        assert_eq!(json["text"], "A");
        assert!(json["status"].is_null());
        assert_eq!(json["ok"], false);
    }
}
