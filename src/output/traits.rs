//! Report renderer trait and shared output types

use crate::crawler::CrawlResult;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("Unknown report format: {0}")]
    UnknownFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// File format of a persisted report
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Json,
    Csv,
}

impl ReportFormat {
    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }

    /// Returns the renderer for this format
    pub fn renderer(&self) -> Box<dyn ReportRenderer> {
        match self {
            ReportFormat::Json => Box::new(super::json::JsonRenderer),
            ReportFormat::Csv => Box::new(super::csv::CsvRenderer),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(OutputError::UnknownFormat(other.to_string())),
        }
    }
}

/// Everything a report is rendered from
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    /// The URL the user asked to crawl, as given
    pub target_url: &'a str,

    /// The crawl outcome
    pub result: &'a CrawlResult,
}

/// Renders a report into its file contents
pub trait ReportRenderer {
    fn format(&self) -> ReportFormat;

    fn render(&self, report: &Report<'_>) -> OutputResult<String>;
}
