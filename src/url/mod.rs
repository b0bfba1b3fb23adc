//! URL handling module for dead-link-checker
//!
//! This module provides URL normalization (canonical comparison keys for
//! pages), href resolution against the page they appear on, and hostname
//! based internal/external classification.

mod domain;
mod normalize;
mod resolve;

// Re-export main functions
pub use domain::{extract_domain, is_internal};
pub use normalize::{normalize_parsed, normalize_url, NormalizedUrl};
pub use resolve::LinkResolver;
