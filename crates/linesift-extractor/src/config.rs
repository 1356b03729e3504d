//! Configuration for an extraction run

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tokio::sync::Semaphore;

/// Order in which accepted lines reach the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputOrder {
    /// Lines are written as soon as their worker finishes
    Unordered,
    /// Lines are written in source order
    Preserve,
}

impl Default for OutputOrder {
    fn default() -> Self {
        OutputOrder::Unordered
    }
}

impl fmt::Display for OutputOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputOrder::Unordered => write!(f, "unordered"),
            OutputOrder::Preserve => write!(f, "preserve"),
        }
    }
}

/// Tuning options for the extraction pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorOptions {
    /// Maximum lines transformed concurrently (0 = available parallelism)
    pub workers: usize,

    /// Capacity of the result queue feeding the writer
    pub queue_capacity: usize,

    /// Output ordering
    pub output_order: OutputOrder,

    /// Bytes batched before each write and flush (0 = 8 KiB)
    pub write_buffer_bytes: usize,
}

impl ExtractorOptions {
    /// Resolve `workers`, falling back to the machine's parallelism
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), String> {
        if self.queue_capacity == 0 {
            return Err("queue_capacity must be greater than 0".to_string());
        }
        if self.workers > Semaphore::MAX_PERMITS {
            return Err(format!(
                "workers must not exceed {}, got {}",
                Semaphore::MAX_PERMITS,
                self.workers
            ));
        }
        Ok(())
    }
}

impl Default for ExtractorOptions {
    /// Unordered output sized to the machine
    fn default() -> Self {
        Self {
            workers: 0,
            queue_capacity: 1024,
            output_order: OutputOrder::Unordered,
            write_buffer_bytes: 64 * 1024,
        }
    }
}

impl ExtractorOptions {
    /// Ordered preset: destination lines follow source order
    pub fn ordered() -> Self {
        Self {
            output_order: OutputOrder::Preserve,
            ..Self::default()
        }
    }

    /// Throughput preset: deeper queue and larger write buffer
    pub fn throughput() -> Self {
        Self {
            workers: 0,
            queue_capacity: 16 * 1024,
            output_order: OutputOrder::Unordered,
            write_buffer_bytes: 1024 * 1024,
        }
    }

    /// Load options from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize options to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }

    /// Load options from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&contents)
    }
}

/// Everything one extraction run needs
pub struct PipelineConfig<T> {
    /// File to read lines from
    pub source_path: PathBuf,

    /// File to write accepted lines to (created or truncated)
    pub destination_path: PathBuf,

    /// Per-line transformer
    pub transformer: T,

    /// Pipeline tuning
    pub options: ExtractorOptions,
}

impl<T> PipelineConfig<T> {
    /// Create a config with default options
    pub fn new(
        source_path: impl Into<PathBuf>,
        destination_path: impl Into<PathBuf>,
        transformer: T,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            destination_path: destination_path.into(),
            transformer,
            options: ExtractorOptions::default(),
        }
    }

    /// Replace the tuning options
    pub fn with_options(mut self, options: ExtractorOptions) -> Self {
        self.options = options;
        self
    }

    /// Check paths and options. Performs no I/O.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.source_path.as_os_str().is_empty() {
            return Err(ExtractError::Configuration(
                "source file path can't be empty".to_string(),
            ));
        }
        if self.destination_path.as_os_str().is_empty() {
            return Err(ExtractError::Configuration(
                "destination file path can't be empty".to_string(),
            ));
        }
        self.options.validate().map_err(ExtractError::Configuration)
    }
}

impl<T> fmt::Debug for PipelineConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("source_path", &self.source_path)
            .field("destination_path", &self.destination_path)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
