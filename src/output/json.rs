//! JSON report rendering

use super::traits::{OutputResult, Report, ReportFormat, ReportRenderer};
use crate::crawler::LinkObservation;
use crate::url::NormalizedUrl;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    target_url: &'a str,
    pages_visited: &'a BTreeSet<NormalizedUrl>,
    link_results: &'a [LinkObservation],
}

/// Pretty-printed JSON document with the target, visited pages, and every observation
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }

    fn render(&self, report: &Report<'_>) -> OutputResult<String> {
        let document = JsonReport {
            target_url: report.target_url,
            pages_visited: &report.result.visited_pages,
            link_results: &report.result.observations,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}
