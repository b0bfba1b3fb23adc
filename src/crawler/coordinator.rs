//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator seeds the frontier, spawns a fixed pool of workers, and
//! waits for them to drain it. Each worker loops:
//! - Take the next page from the frontier (or park until one appears)
//! - Fetch it and extract its links
//! - Enqueue internal pages that were never seen
//! - Probe each outgoing href it is the first to claim
//! - Mark the page finished
//!
//! A failed page or link is data, not an error. Only invariant breaches and
//! lock poisoning abort the crawl; the first worker to hit one stops the rest.

use crate::config::{validate, Config};
use crate::crawler::aggregator::{CrawlResult, LinkObservation, ResultAggregator};
use crate::crawler::checker::{HttpStatusChecker, StatusChecker};
use crate::crawler::fetcher::{build_http_client, FetchResult, HttpFetcher, PageFetcher};
use crate::crawler::frontier::{Frontier, FrontierStats};
use crate::crawler::parser::{LinkExtractor, OutgoingLink};
use crate::state::PageState;
use crate::url::{extract_domain, normalize_parsed, normalize_url, LinkResolver, NormalizedUrl};
use crate::{CrawlError, UrlError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use url::Url;

/// Completed pages between two progress log lines
const PROGRESS_LOG_INTERVAL: usize = 25;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    seed: NormalizedUrl,
    frontier: Arc<Frontier>,
    aggregator: Arc<ResultAggregator>,
    extractor: Arc<LinkExtractor>,
    fetcher: Arc<dyn PageFetcher>,
    checker: Arc<dyn StatusChecker>,
}

impl Coordinator {
    /// Creates a coordinator that talks HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `start_url` - The seed page; its host defines the crawl domain
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError)` - Invalid configuration or seed URL
    pub fn new(config: Config, start_url: &str) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.http)?;
        let fetcher = Arc::new(HttpFetcher::new(client.clone()));
        let checker = Arc::new(HttpStatusChecker::from_config(client, &config.http));

        Self::with_collaborators(config, start_url, fetcher, checker)
    }

    /// Creates a coordinator with custom fetching and probing
    pub fn with_collaborators(
        config: Config,
        start_url: &str,
        fetcher: Arc<dyn PageFetcher>,
        checker: Arc<dyn StatusChecker>,
    ) -> Result<Self, CrawlError> {
        validate(&config)?;

        let seed = normalize_url(start_url)?;
        let base_domain = seed_domain(&seed.to_url()?)?;

        let frontier = Frontier::new();
        frontier.try_enqueue(seed.clone())?;

        let extractor = LinkExtractor::new(base_domain, LinkResolver::from_config(&config.filter));

        Ok(Self {
            config: Arc::new(config),
            seed,
            frontier: Arc::new(frontier),
            aggregator: Arc::new(ResultAggregator::new()),
            extractor: Arc::new(extractor),
            fetcher,
            checker,
        })
    }

    /// The normalized seed page
    pub fn seed(&self) -> &NormalizedUrl {
        &self.seed
    }

    /// Host that defines which pages are internal
    pub fn base_domain(&self) -> &str {
        self.extractor.base_domain()
    }

    /// Returns a handle for observing the crawl while it runs
    pub fn progress(&self) -> ProgressHandle {
        ProgressHandle {
            frontier: Arc::clone(&self.frontier),
            aggregator: Arc::clone(&self.aggregator),
        }
    }

    /// Runs the crawl to completion
    pub async fn run(self) -> Result<CrawlResult, CrawlError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the crawl until it completes or `shutdown` resolves
    ///
    /// On shutdown all workers are aborted and the observations recorded so
    /// far are returned with `interrupted` set.
    pub async fn run_until<F>(self, shutdown: F) -> Result<CrawlResult, CrawlError>
    where
        F: Future<Output = ()>,
    {
        let concurrency = self.config.crawler.concurrency;
        tracing::info!(
            "Starting crawl of {} with {} workers",
            self.seed,
            concurrency
        );

        let mut workers = JoinSet::new();
        for id in 0..concurrency {
            workers.spawn(self.worker(id).run());
        }

        tokio::pin!(shutdown);
        let mut interrupted = false;

        loop {
            tokio::select! {
                joined = workers.join_next() => match joined {
                    None => break,
                    Some(Ok(Ok(()))) => {}
                    Some(Ok(Err(e))) => {
                        tracing::error!("Worker failed, aborting crawl: {}", e);
                        workers.shutdown().await;
                        return Err(e);
                    }
                    Some(Err(e)) => {
                        tracing::error!("Worker panicked or was cancelled: {}", e);
                        workers.shutdown().await;
                        return Err(e.into());
                    }
                },
                _ = &mut shutdown => {
                    tracing::warn!("Shutdown requested, stopping {} workers", workers.len());
                    workers.shutdown().await;
                    interrupted = true;
                    break;
                }
            }
        }

        let visited = self.frontier.visited_pages()?;
        let result = self.aggregator.finish(visited, interrupted)?;

        tracing::info!(
            "Crawl completed: {} pages crawled, {} links checked, {} broken in {:?}",
            result.pages_visited(),
            result.links_checked(),
            result.broken_count(),
            result.elapsed
        );

        Ok(result)
    }

    fn worker(&self, id: usize) -> Worker {
        Worker {
            id,
            frontier: Arc::clone(&self.frontier),
            aggregator: Arc::clone(&self.aggregator),
            extractor: Arc::clone(&self.extractor),
            fetcher: Arc::clone(&self.fetcher),
            checker: Arc::clone(&self.checker),
        }
    }
}

/// The seed must be an http(s) URL with a host
fn seed_domain(seed: &Url) -> Result<String, UrlError> {
    match seed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }
    extract_domain(seed).ok_or(UrlError::MissingDomain)
}

/// Live view of a running crawl
#[derive(Debug, Clone)]
pub struct ProgressHandle {
    frontier: Arc<Frontier>,
    aggregator: Arc<ResultAggregator>,
}

/// Counters reported by [`ProgressHandle::snapshot`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CrawlProgress {
    pub frontier: FrontierStats,
    pub links_checked: usize,
    pub elapsed: Duration,
}

impl ProgressHandle {
    pub fn snapshot(&self) -> Result<CrawlProgress, CrawlError> {
        Ok(CrawlProgress {
            frontier: self.frontier.stats()?,
            links_checked: self.aggregator.len()?,
            elapsed: self.aggregator.elapsed(),
        })
    }
}

/// One crawl worker; all state is shared through the frontier and aggregator
struct Worker {
    id: usize,
    frontier: Arc<Frontier>,
    aggregator: Arc<ResultAggregator>,
    extractor: Arc<LinkExtractor>,
    fetcher: Arc<dyn PageFetcher>,
    checker: Arc<dyn StatusChecker>,
}

impl Worker {
    async fn run(self) -> Result<(), CrawlError> {
        tracing::debug!("Worker {} started", self.id);
        let mut pages = 0usize;

        while let Some(page) = self.frontier.next_page().await? {
            let outcome = self.process_page(&page).await?;
            let completed = self.frontier.complete(&page, outcome)?;
            pages += 1;

            if completed % PROGRESS_LOG_INTERVAL == 0 {
                let stats = self.frontier.stats()?;
                tracing::info!(
                    "Progress: {} pages crawled, {} pending, {} links claimed",
                    completed,
                    stats.pending,
                    stats.links_claimed
                );
            }
        }

        tracing::debug!("Worker {} finished after {} pages", self.id, pages);
        Ok(())
    }

    /// Fetches one page and handles its links
    ///
    /// Returns the terminal state the page should move to.
    async fn process_page(&self, page: &NormalizedUrl) -> Result<PageState, CrawlError> {
        tracing::debug!("Worker {} processing {}", self.id, page);

        match self.fetcher.fetch_page(page.as_str()).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                if final_url != page.as_str() {
                    tracing::debug!("{} redirected to {}", page, final_url);
                }
                tracing::trace!("Fetched {} ({}, {} bytes)", page, status_code, body.len());

                let links = self.extractor.extract(page.as_str(), &body);
                self.enqueue_internal(links.internal)?;
                self.probe_outgoing(page, links.outgoing).await?;

                Ok(PageState::Extracted)
            }
            FetchResult::ContentMismatch {
                status_code,
                content_type,
            } => {
                tracing::debug!(
                    "Not parsing {} ({}, content-type {:?})",
                    page,
                    status_code,
                    content_type
                );
                Ok(PageState::Extracted)
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Failed to fetch {}: {}", page, error);
                self.aggregator.record(LinkObservation::fetch_failed(page))?;
                Ok(PageState::FetchFailed)
            }
        }
    }

    fn enqueue_internal(&self, links: Vec<Url>) -> Result<(), CrawlError> {
        for link in links {
            let normalized = normalize_parsed(link);
            if self.frontier.try_enqueue(normalized.clone())? {
                tracing::debug!("Discovered {}", normalized);
            }
        }
        Ok(())
    }

    async fn probe_outgoing(
        &self,
        source: &NormalizedUrl,
        links: Vec<OutgoingLink>,
    ) -> Result<(), CrawlError> {
        for link in links {
            if !self.frontier.try_claim_external(&link.href)? {
                continue;
            }

            self.frontier.begin_probe(&link.href)?;
            let status = self.checker.check_status(&link.href).await;
            self.frontier.finish_probe(&link.href, status)?;

            let observation = LinkObservation::new(source.clone(), link.href, link.text, status);
            if !observation.ok {
                tracing::info!(
                    "Broken link {} on {} ({})",
                    observation.href,
                    source,
                    status.map_or_else(|| "no response".to_string(), |s| s.to_string())
                );
            }
            self.aggregator.record(observation)?;
        }
        Ok(())
    }
}
