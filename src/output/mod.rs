//! Output module for crawl reports
//!
//! This module handles:
//! - Rendering results as JSON or CSV
//! - Persisting reports under the results directory
//! - Printing the console summary

mod csv;
mod json;
mod report;
pub mod stats;
mod traits;

pub use self::csv::{CsvRenderer, CSV_HEADER};
pub use json::JsonRenderer;
pub use report::{report_file_name, sanitize_hostname, write_report};
pub use stats::{format_broken_links, format_summary, print_broken_links, print_summary};
pub use traits::{OutputError, OutputResult, Report, ReportFormat, ReportRenderer};
