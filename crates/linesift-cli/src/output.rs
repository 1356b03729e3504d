//! Output formatting for the CLI.

use crate::error::Result;
use linesift_extractor::ExtractionReport;

/// Report formatter.
pub struct Formatter {
    json: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Format a finished run.
    pub fn format_report(&self, report: &ExtractionReport) -> Result<String> {
        if self.json {
            return Ok(report.to_json()?);
        }
        Ok(report.summary())
    }
}
