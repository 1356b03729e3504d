//! Error types for line extraction

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can end an extraction run
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Empty path or invalid options, detected before any I/O
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The source file could not be opened for reading
    #[error("Failed to open source file {}: {source}", .path.display())]
    SourceOpen {
        /// Path that was opened
        path: PathBuf,
        /// Underlying I/O failure
        source: io::Error,
    },

    /// The destination file could not be created or truncated
    #[error("Failed to open destination file {}: {source}", .path.display())]
    DestinationOpen {
        /// Path that was opened
        path: PathBuf,
        /// Underlying I/O failure
        source: io::Error,
    },

    /// Reading the source failed before end-of-stream
    #[error("Failed to read source file after {line} line(s): {source}")]
    SourceRead {
        /// Number of lines read successfully before the failure
        line: u64,
        /// Underlying I/O failure
        source: io::Error,
    },

    /// One or more accepted lines could not be written
    #[error("Failed to write {failed} accepted line(s), first at line {first_line}: {first_error}")]
    PartialWrite {
        /// Number of accepted lines that never reached the destination
        failed: usize,
        /// One-based source line number of the earliest lost line
        first_line: u64,
        /// Failure reported for that line
        #[source]
        first_error: io::Error,
    },

    /// A per-line unit or the writer task did not complete
    #[error("Worker error: {0}")]
    Worker(String),

    /// The runtime for [`extract_blocking`](crate::extract_blocking) could not be built
    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),
}

impl ExtractError {
    /// Whether the caller can fix this by correcting the configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, ExtractError::Configuration(_))
    }
}
