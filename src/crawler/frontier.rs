//! Crawl frontier shared by all workers
//!
//! The frontier owns the only shared mutable state of a crawl: the pages seen
//! so far (with their `PageState`), the hrefs claimed for probing (with their
//! `LinkState`), the queue of pages waiting for a worker, and the number of
//! pages currently being fetched. Every operation takes the same lock, so each
//! check-then-insert is atomic.
//!
//! Termination is detected with the in-flight counter plus a `Notify` that is
//! signalled on every enqueue and every fetch completion. A worker that finds
//! the queue empty while other workers are still fetching parks on the notify
//! instead of exiting.

use crate::state::{LinkState, PageState};
use crate::url::NormalizedUrl;
use crate::CrawlError;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;

/// Mutable crawl state guarded by the frontier lock
#[derive(Debug, Default)]
struct CrawlState {
    /// Every page ever enqueued, keyed by canonical URL
    pages: HashMap<NormalizedUrl, PageState>,

    /// Every href ever claimed for probing
    links: HashMap<String, LinkState>,

    /// Pages waiting for a worker
    pending: VecDeque<NormalizedUrl>,

    /// Pages handed to a worker and not yet completed
    in_flight: usize,

    /// Pages that reached a terminal state
    completed: usize,
}

impl CrawlState {
    fn set_page_state(&mut self, url: &NormalizedUrl, next: PageState) -> Result<(), CrawlError> {
        let current = self.pages.get(url).copied().unwrap_or(PageState::Unseen);
        if !current.can_transition_to(next) {
            return Err(CrawlError::InvalidTransition {
                url: url.to_string(),
                from: current,
                to: next,
            });
        }
        self.pages.insert(url.clone(), next);
        Ok(())
    }

    fn set_link_state(&mut self, href: &str, next: LinkState) -> Result<(), CrawlError> {
        let current = self.links.get(href).copied().unwrap_or(LinkState::Unseen);
        if !current.can_transition_to(next) {
            return Err(CrawlError::InvalidLinkTransition {
                href: href.to_string(),
                from: current,
                to: next,
            });
        }
        self.links.insert(href.to_string(), next);
        Ok(())
    }

    fn take_next(&mut self) -> Result<Option<NormalizedUrl>, CrawlError> {
        let Some(url) = self.pending.pop_front() else {
            return Ok(None);
        };
        self.set_page_state(&url, PageState::Fetching)?;
        self.in_flight += 1;
        Ok(Some(url))
    }

    fn is_done(&self) -> bool {
        self.pending.is_empty() && self.in_flight == 0
    }
}

/// Point-in-time counters of the frontier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontierStats {
    /// Pages enqueued so far (fetched, being fetched, or waiting)
    pub pages_seen: usize,

    /// Pages waiting for a worker
    pub pending: usize,

    /// Pages currently being fetched
    pub in_flight: usize,

    /// Pages that reached a terminal state
    pub completed: usize,

    /// Hrefs claimed for probing
    pub links_claimed: usize,
}

/// Shared frontier of a single crawl
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<CrawlState>,
    changed: Notify,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, CrawlState>, CrawlError> {
        self.state.lock().map_err(|_| CrawlError::StatePoisoned)
    }

    /// Adds a page unless it was seen before
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The page is new; it is now queued and will be fetched once
    /// * `Ok(false)` - The page was already enqueued or fetched
    pub fn try_enqueue(&self, url: NormalizedUrl) -> Result<bool, CrawlError> {
        {
            let mut state = self.lock()?;
            if state.pages.contains_key(&url) {
                return Ok(false);
            }
            state.set_page_state(&url, PageState::Enqueued)?;
            state.pending.push_back(url);
        }

        self.changed.notify_waiters();
        Ok(true)
    }

    /// Claims an href for probing; only the first caller for a given href wins
    pub fn try_claim_external(&self, href: &str) -> Result<bool, CrawlError> {
        let mut state = self.lock()?;
        if state.links.contains_key(href) {
            return Ok(false);
        }
        state.set_link_state(href, LinkState::Claimed)?;
        Ok(true)
    }

    /// Marks a claimed href as being probed
    pub fn begin_probe(&self, href: &str) -> Result<(), CrawlError> {
        self.lock()?.set_link_state(href, LinkState::Probing)
    }

    /// Records the outcome of a probe
    pub fn finish_probe(&self, href: &str, status: Option<u16>) -> Result<(), CrawlError> {
        self.lock()?
            .set_link_state(href, LinkState::from_status(status))
    }

    /// Takes the next pending page without waiting
    ///
    /// The returned page counts as in flight until [`Frontier::complete`] is
    /// called for it.
    pub fn dequeue(&self) -> Result<Option<NormalizedUrl>, CrawlError> {
        self.lock()?.take_next()
    }

    /// Returns true iff no page is pending and no page is being fetched
    pub fn is_done(&self) -> Result<bool, CrawlError> {
        Ok(self.lock()?.is_done())
    }

    /// Waits for the next page to fetch
    ///
    /// # Returns
    ///
    /// * `Ok(Some(url))` - A page this worker now owns
    /// * `Ok(None)` - The crawl is finished: the queue is empty and no worker
    ///   is fetching, so no new page can appear
    pub async fn next_page(&self) -> Result<Option<NormalizedUrl>, CrawlError> {
        loop {
            // Registered before the check so a wakeup between check and await is kept
            let changed = self.changed.notified();

            {
                let mut state = self.lock()?;
                if let Some(url) = state.take_next()? {
                    return Ok(Some(url));
                }
                if state.is_done() {
                    return Ok(None);
                }
            }

            changed.await;
        }
    }

    /// Finishes an in-flight page with `Extracted` or `FetchFailed`
    ///
    /// Returns the number of pages completed so far.
    pub fn complete(&self, url: &NormalizedUrl, outcome: PageState) -> Result<usize, CrawlError> {
        let completed = {
            let mut state = self.lock()?;
            state.set_page_state(url, outcome)?;
            state.in_flight -= 1;
            state.completed += 1;
            state.completed
        };

        self.changed.notify_waiters();
        Ok(completed)
    }

    /// Returns the current state of a page
    pub fn page_state(&self, url: &NormalizedUrl) -> Result<PageState, CrawlError> {
        Ok(self
            .lock()?
            .pages
            .get(url)
            .copied()
            .unwrap_or(PageState::Unseen))
    }

    /// Returns the current state of an href
    pub fn link_state(&self, href: &str) -> Result<LinkState, CrawlError> {
        Ok(self
            .lock()?
            .links
            .get(href)
            .copied()
            .unwrap_or(LinkState::Unseen))
    }

    /// Returns every page enqueued during the crawl
    pub fn visited_pages(&self) -> Result<BTreeSet<NormalizedUrl>, CrawlError> {
        Ok(self.lock()?.pages.keys().cloned().collect())
    }

    /// Returns the current frontier counters
    pub fn stats(&self) -> Result<FrontierStats, CrawlError> {
        let state = self.lock()?;
        Ok(FrontierStats {
            pages_seen: state.pages.len(),
            pending: state.pending.len(),
            in_flight: state.in_flight,
            completed: state.completed,
            links_claimed: state.links.len(),
        })
    }
}
