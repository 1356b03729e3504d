//! Linesift Extractor
//!
//! Streams a source text file line by line, runs a caller-supplied transformer
//! over every line, and writes the accepted results to a destination file.
//!
//! # Overview
//!
//! A run is a single call to [`extract`]. The source is read by one producer,
//! each line is transformed on a bounded pool of blocking workers, and a single
//! writer task owns the destination handle.
//!
//! # Architecture
//!
//! ```text
//! Source → LineReader → worker pool (LineTransformer) → writer task → Destination
//! ```
//!
//! # Key Features
//!
//! - **Bounded concurrency**: at most `workers` lines are transformed at once
//! - **Single writer**: all appends go through one task that owns the file
//! - **Optional ordering**: [`OutputOrder::Preserve`] keeps source order
//! - **No silent loss**: failed writes surface as [`ExtractError::PartialWrite`]
//! - **Truncating output**: the destination is created or truncated per run
//!
//! # Example Usage
//!
//! ```no_run
//! use linesift_extractor::{extract, PipelineConfig, TransformResult};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::new("access.log", "errors.log", |line: &str| {
//!     if line.contains("ERROR") {
//!         TransformResult::accept(line.to_uppercase())
//!     } else {
//!         TransformResult::reject()
//!     }
//! });
//!
//! let report = extract(config).await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod types;
mod transform;
mod reader;
mod writer;
mod extractor;


pub use error::ExtractError;
pub use config::{ExtractorOptions, OutputOrder, PipelineConfig};
pub use types::{ExtractionReport, TransformResult};
pub use transform::LineTransformer;
pub use extractor::{extract, extract_blocking};
