/// Page state definitions for tracking crawl progress
///
/// This module defines all states an internal page can be in during a crawl.
use std::fmt;

/// Represents the current state of a page in the crawl process
///
/// Transitions: `Unseen -> Enqueued -> Fetching -> {Extracted | FetchFailed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Page has not been discovered yet
    Unseen,

    /// Page is in the frontier waiting for a worker
    Enqueued,

    /// A worker has claimed the page and is fetching it
    Fetching,

    /// Page was fetched and its links extracted
    Extracted,

    /// Page could not be fetched (network-level failure)
    FetchFailed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Extracted | Self::FetchFailed)
    }

    /// Returns true if the page is waiting for or undergoing a fetch
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Enqueued | Self::Fetching)
    }

    /// Returns true if moving from this state to `next` is allowed
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Unseen, Self::Enqueued)
                | (Self::Enqueued, Self::Fetching)
                | (Self::Fetching, Self::Extracted)
                | (Self::Fetching, Self::FetchFailed)
        )
    }

    /// Returns the lowercase name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unseen => "unseen",
            Self::Enqueued => "enqueued",
            Self::Fetching => "fetching",
            Self::Extracted => "extracted",
            Self::FetchFailed => "fetch_failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
