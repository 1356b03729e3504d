//! Per-line results and run reports

use crate::config::OutputOrder;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of transforming one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    /// Text written in place of the line when accepted
    pub text: String,

    /// Whether the line is kept
    pub accepted: bool,
}

impl TransformResult {
    /// Keep the line, writing `text` in its place
    pub fn accept(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            accepted: true,
        }
    }

    /// Drop the line
    pub fn reject() -> Self {
        Self {
            text: String::new(),
            accepted: false,
        }
    }

    /// Derived text, if accepted
    pub fn into_accepted(self) -> Option<String> {
        self.accepted.then_some(self.text)
    }
}

impl From<Option<String>> for TransformResult {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) => TransformResult::accept(text),
            None => TransformResult::reject(),
        }
    }
}

/// Summary of a successful extraction run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    /// File the lines were read from
    pub source_path: PathBuf,

    /// File the accepted lines were written to
    pub destination_path: PathBuf,

    /// Lines read from the source
    pub lines_read: u64,

    /// Lines the transformer accepted
    pub lines_accepted: u64,

    /// Lines the transformer rejected
    pub lines_rejected: u64,

    /// Lines written to the destination
    pub lines_written: u64,

    /// Bytes written to the destination, terminators included
    pub bytes_written: u64,

    /// Concurrency limit used for the run
    pub workers: usize,

    /// Ordering mode used for the run
    pub output_order: OutputOrder,

    /// Wall-clock time of the run in milliseconds
    pub elapsed_ms: u64,
}

impl ExtractionReport {
    /// One-line human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "{} lines read, {} accepted, {} rejected, {} written ({} bytes) to {} in {} ms",
            self.lines_read,
            self.lines_accepted,
            self.lines_rejected,
            self.lines_written,
            self.bytes_written,
            self.destination_path.display(),
            self.elapsed_ms
        )
    }

    /// Pretty JSON representation
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A transformed line on its way to the writer
#[derive(Debug)]
pub(crate) struct LineOutcome {
    /// Zero-based position of the line in the source
    pub index: u64,

    /// Derived text for accepted lines
    pub text: Option<String>,
}
