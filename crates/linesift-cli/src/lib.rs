//! Linesift CLI library.
//!
//! Argument parsing, the built-in line filter, and report formatting for the
//! `linesift` command. The extraction itself lives in `linesift-extractor`.

pub mod cli;
pub mod error;
pub mod filter;
pub mod output;

pub use cli::{Cli, CliCase};
pub use error::{CliError, Result};
pub use filter::{CaseConversion, LineFilter};
pub use output::Formatter;
