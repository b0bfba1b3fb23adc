//! Configuration module for dead-link-checker
//!
//! This module handles the crawl configuration: its typed sections, loading
//! from an optional TOML file, and validation of every recognised option.
//!
//! # Example
//!
//! ```no_run
//! use dead_link_checker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("checker.toml")).unwrap();
//! println!("Crawling with {} workers", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FilterConfig, HttpConfig, OutputConfig};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
