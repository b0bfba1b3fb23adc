//! Console summary of a finished crawl

use crate::crawler::{CrawlResult, CrawlSummary};
use std::fmt::Write;

/// Formats the end-of-crawl summary block
pub fn format_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nSummary Report");
    let _ = writeln!(out, "==============");
    let _ = writeln!(out, "Pages crawled:       {}", summary.pages_crawled);
    let _ = writeln!(out, "Total links checked: {}", summary.links_checked);
    let _ = writeln!(out, "Broken links:        {}", summary.broken_links);
    let _ = writeln!(
        out,
        "Time elapsed:        {:.2}s",
        summary.elapsed.as_secs_f64()
    );
    out
}

/// Formats the list of broken links, or an empty string if there are none
pub fn format_broken_links(result: &CrawlResult) -> String {
    let mut out = String::new();
    let mut broken = result.broken_links().peekable();
    if broken.peek().is_none() {
        return out;
    }

    let _ = writeln!(out, "\nBroken Links Found:");
    for observation in broken {
        let status = observation
            .status
            .map_or_else(|| "N/A".to_string(), |s| s.to_string());
        let _ = writeln!(out, "- {} [{}]", observation.href, status);
        let _ = writeln!(out, "  on: {}", observation.source);
    }
    out
}

/// Prints the summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    print!("{}", format_summary(summary));
}

/// Prints every broken link to stdout
pub fn print_broken_links(result: &CrawlResult) {
    print!("{}", format_broken_links(result));
}
