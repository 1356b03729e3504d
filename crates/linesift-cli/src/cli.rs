//! CLI argument parsing.

use crate::error::{CliError, Result};
use crate::filter::{CaseConversion, LineFilter};
use clap::{ArgAction, Parser};
use linesift_extractor::{ExtractorOptions, OutputOrder};
use std::path::PathBuf;

/// Linesift - Extract and transform matching lines from a text file.
#[derive(Debug, Parser)]
#[command(name = "linesift")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source file to read lines from
    pub source: PathBuf,

    /// Destination file (created or truncated)
    pub destination: PathBuf,

    /// Keep lines containing TEXT (repeatable, any match keeps)
    #[arg(short = 'c', long = "contains", value_name = "TEXT")]
    pub contains: Vec<String>,

    /// Drop lines containing TEXT (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "TEXT")]
    pub exclude: Vec<String>,

    /// Match --contains and --exclude case-insensitively
    #[arg(short, long)]
    pub ignore_case: bool,

    /// Drop empty lines
    #[arg(long)]
    pub skip_empty: bool,

    /// Trim surrounding whitespace from each line
    #[arg(long)]
    pub trim: bool,

    /// Convert kept lines to upper or lower case
    #[arg(long, value_enum)]
    pub case: Option<CliCase>,

    /// Maximum lines transformed concurrently (0 = all cores)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Capacity of the queue feeding the writer
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Write lines in source order
    #[arg(long)]
    pub ordered: bool,

    /// Pipeline options file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Case conversion options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliCase {
    /// Uppercase
    Upper,
    /// Lowercase
    Lower,
}

impl From<CliCase> for CaseConversion {
    fn from(case: CliCase) -> Self {
        match case {
            CliCase::Upper => CaseConversion::Upper,
            CliCase::Lower => CaseConversion::Lower,
        }
    }
}

impl Cli {
    /// Pipeline options: the config file (or defaults) with flags applied on top.
    pub fn options(&self) -> Result<ExtractorOptions> {
        let mut options = match &self.config {
            Some(path) => ExtractorOptions::from_file(path).map_err(CliError::Config)?,
            None => ExtractorOptions::default(),
        };

        if let Some(workers) = self.workers {
            options.workers = workers;
        }
        if let Some(capacity) = self.queue_capacity {
            options.queue_capacity = capacity;
        }
        if self.ordered {
            options.output_order = OutputOrder::Preserve;
        }

        options.validate().map_err(CliError::Config)?;
        Ok(options)
    }

    /// Line filter described by the flags.
    pub fn filter(&self) -> Result<LineFilter> {
        if self.contains.iter().chain(&self.exclude).any(String::is_empty) {
            return Err(CliError::InvalidInput(
                "--contains and --exclude need non-empty text".to_string(),
            ));
        }

        Ok(LineFilter::new()
            .include(self.contains.iter().cloned())
            .exclude(self.exclude.iter().cloned())
            .ignore_case(self.ignore_case)
            .skip_empty(self.skip_empty)
            .trim(self.trim)
            .case(self.case.map(Into::into))
            .build())
    }

    /// Default log filter for the verbosity level, used when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
