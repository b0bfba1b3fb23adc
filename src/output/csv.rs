//! CSV report rendering
//!
//! One row per observation. Text fields are always quoted (embedded quotes
//! doubled); an unknown status is an empty field.

use super::traits::{OutputError, OutputResult, Report, ReportFormat, ReportRenderer};
use csv::{QuoteStyle, Terminator, WriterBuilder};

/// Column names of the CSV report
pub const CSV_HEADER: [&str; 5] = ["Source", "URL", "Status", "OK", "Text"];

/// Flat table of observations
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl ReportRenderer for CsvRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }

    fn render(&self, report: &Report<'_>) -> OutputResult<String> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::NonNumeric)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(CSV_HEADER)?;

        for observation in &report.result.observations {
            let status = observation
                .status
                .map(|s| s.to_string())
                .unwrap_or_default();
            let ok = if observation.ok { "true" } else { "false" };

            writer.write_record([
                observation.source.as_str(),
                observation.href.as_str(),
                status.as_str(),
                ok,
                observation.text.as_str(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| OutputError::Write(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| OutputError::Format(e.to_string()))
    }
}
