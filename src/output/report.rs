//! Report persistence
//!
//! Reports are written to `<results_dir>/result-<host>-<YYYY-MM-DD_HH-MM>.<ext>`
//! with a UTC timestamp. The directory is created if needed.

use super::traits::{OutputResult, Report, ReportFormat};
use crate::crawler::CrawlResult;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M";

/// Host label used when the target has no host
const FALLBACK_HOST: &str = "site";

/// Renders and writes a report
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(OutputError)` - Rendering or writing failed
pub fn write_report(
    format: ReportFormat,
    target_url: &str,
    result: &CrawlResult,
    results_dir: &Path,
) -> OutputResult<PathBuf> {
    let report = Report { target_url, result };
    let contents = format.renderer().render(&report)?;

    fs::create_dir_all(results_dir)?;
    let path = results_dir.join(report_file_name(format, target_url, Utc::now()));
    fs::write(&path, contents)?;

    tracing::info!("Wrote {} report to {}", format, path.display());
    Ok(path)
}

/// Builds the file name of a report
pub fn report_file_name(format: ReportFormat, target_url: &str, at: DateTime<Utc>) -> String {
    format!(
        "result-{}-{}.{}",
        sanitize_hostname(target_url),
        at.format(TIMESTAMP_FORMAT),
        format.extension()
    )
}

/// Extracts the host of `raw_url` and replaces every character outside
/// `[A-Za-z0-9.-]` with `_`
pub fn sanitize_hostname(raw_url: &str) -> String {
    Url::parse(raw_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .filter(|host| !host.is_empty())
        .map(|host| {
            host.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect()
        })
        .unwrap_or_else(|| FALLBACK_HOST.to_string())
}
