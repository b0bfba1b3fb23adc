//! State module for tracking crawl progress
//!
//! This module provides the two state machines the frontier enforces during a
//! crawl.
//!
//! # Components
//!
//! - `PageState`: lifecycle of an internal page (enqueued, fetching, extracted, failed)
//! - `LinkState`: lifecycle of a probed href (claimed, probing, checked, unknown)

mod link_state;
mod page_state;

// Re-export main types
pub use link_state::LinkState;
pub use page_state::PageState;
