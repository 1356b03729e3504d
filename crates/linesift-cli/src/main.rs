//! Linesift CLI - Extract and transform matching lines from a text file.

use clap::Parser;
use linesift_cli::{Cli, Formatter};
use linesift_extractor::{extract, PipelineConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing (log to stderr)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> linesift_cli::Result<()> {
    let options = cli.options()?;
    let filter = cli.filter()?;
    let formatter = Formatter::new(cli.json);
    debug!("Pipeline options: {:?}", options);

    let config = PipelineConfig::new(cli.source, cli.destination, filter).with_options(options);
    let report = extract(config).await?;

    println!("{}", formatter.format_report(&report)?);
    Ok(())
}
