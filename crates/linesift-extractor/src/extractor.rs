//! Core extraction pipeline

use crate::config::PipelineConfig;
use crate::error::ExtractError;
use crate::reader::LineReader;
use crate::transform::LineTransformer;
use crate::types::{ExtractionReport, LineOutcome};
use crate::writer::{run_writer, WriterSummary};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

/// Run one extraction.
///
/// Validates `config` before touching the filesystem, opens the source, then
/// creates or truncates the destination. Lines are transformed on at most
/// `options.workers` concurrent units, and all accepted lines pass through a
/// single writer task. Returns only after every unit and the writer finished.
///
/// # Errors
///
/// A read failure wins over a failed unit, which wins over failed writes.
/// Partial output may already be on disk for any error past
/// [`ExtractError::DestinationOpen`].
pub async fn extract<T>(config: PipelineConfig<T>) -> Result<ExtractionReport, ExtractError>
where
    T: LineTransformer,
{
    config.validate()?;

    let PipelineConfig {
        source_path,
        destination_path,
        transformer,
        options,
    } = config;
    let workers = options.effective_workers();
    let start = Instant::now();

    info!(
        "Starting extraction from '{}' to '{}' ({} workers, {} output)",
        source_path.display(),
        destination_path.display(),
        workers,
        options.output_order
    );

    let source = File::open(&source_path)
        .await
        .map_err(|source| ExtractError::SourceOpen {
            path: source_path.clone(),
            source,
        })?;

    let destination = open_destination(&destination_path)
        .await
        .map_err(|source| ExtractError::DestinationOpen {
            path: destination_path.clone(),
            source,
        })?;

    let (tx, rx) = mpsc::channel(options.queue_capacity);
    let writer = tokio::spawn(run_writer(
        destination,
        rx,
        options.output_order,
        options.write_buffer_bytes,
    ));

    let dispatch = dispatch_lines(
        LineReader::new(BufReader::new(source)),
        Arc::new(transformer),
        workers,
        tx,
    )
    .await;

    let written = writer
        .await
        .map_err(|e| ExtractError::Worker(format!("Writer task failed: {}", e)))?;

    let report = ExtractionReport {
        source_path,
        destination_path,
        lines_read: dispatch.lines_read,
        lines_accepted: dispatch.lines_accepted,
        lines_rejected: dispatch.lines_rejected,
        lines_written: written.lines_written,
        bytes_written: written.bytes_written,
        workers,
        output_order: options.output_order,
        elapsed_ms: elapsed_millis(start.elapsed()),
    };

    finish(report, dispatch, written)
}

/// Run [`extract`] on a fresh multi-threaded runtime.
///
/// Must not be called from within an async context.
pub fn extract_blocking<T>(config: PipelineConfig<T>) -> Result<ExtractionReport, ExtractError>
where
    T: LineTransformer,
{
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(ExtractError::Runtime)?
        .block_on(extract(config))
}

#[cfg(unix)]
async fn open_destination(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o644)
        .open(path)
        .await
}

#[cfg(not(unix))]
async fn open_destination(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await
}

/// What the reader and the worker units did over a run
#[derive(Debug, Default)]
struct DispatchSummary {
    lines_read: u64,
    lines_accepted: u64,
    lines_rejected: u64,
    /// Lines read before the failure, and the failure
    read_error: Option<(u64, io::Error)>,
    /// First unit that did not complete
    unit_error: Option<String>,
}

impl DispatchSummary {
    fn record_unit(&mut self, joined: Result<Result<bool, String>, JoinError>) {
        match joined {
            Ok(Ok(true)) => self.lines_accepted += 1,
            Ok(Ok(false)) => self.lines_rejected += 1,
            Ok(Err(message)) => {
                warn!("{}", message);
                if self.unit_error.is_none() {
                    self.unit_error = Some(message);
                }
            }
            Err(e) => {
                warn!("Line unit failed: {}", e);
                if self.unit_error.is_none() {
                    self.unit_error = Some(format!("Line unit failed: {}", e));
                }
            }
        }
    }
}

/// Read every line and hand it to a bounded set of blocking units.
///
/// Drops `results` once the last unit has finished so the writer can close.
async fn dispatch_lines<R, T>(
    mut reader: LineReader<R>,
    transformer: Arc<T>,
    workers: usize,
    results: mpsc::Sender<LineOutcome>,
) -> DispatchSummary
where
    R: AsyncBufRead + Unpin,
    T: LineTransformer,
{
    let permits = Arc::new(Semaphore::new(workers));
    let mut units = JoinSet::new();
    let mut summary = DispatchSummary::default();

    loop {
        let line = match reader.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read source after {} lines: {}", reader.lines_read(), e);
                summary.read_error = Some((reader.lines_read(), e));
                break;
            }
        };
        let index = reader.lines_read() - 1;

        // Never closed, so acquiring only waits for a free slot
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };

        let transformer = Arc::clone(&transformer);
        let results = results.clone();
        units.spawn_blocking(move || {
            let transformed = panic::catch_unwind(AssertUnwindSafe(|| transformer.transform(&line)));
            let (text, unit) = match transformed {
                Ok(result) => {
                    let text = result.into_accepted();
                    let accepted = text.is_some();
                    (text, Ok(accepted))
                }
                Err(payload) => (
                    None,
                    Err(format!(
                        "Transformer panicked at line {}: {}",
                        index + 1,
                        panic_message(&*payload)
                    )),
                ),
            };
            // A panicked line still reports its index so ordered output can move past it.
            // Sending only fails if the writer is gone, which surfaces when it is joined
            let _ = results.blocking_send(LineOutcome { index, text });
            drop(permit);
            unit
        });

        while let Some(joined) = units.try_join_next() {
            summary.record_unit(joined);
        }
    }

    summary.lines_read = reader.lines_read();
    drop(results);
    debug!(
        "Reader done after {} lines, waiting for {} units",
        summary.lines_read,
        units.len()
    );

    while let Some(joined) = units.join_next().await {
        summary.record_unit(joined);
    }

    summary
}

/// Whole milliseconds, saturating at `u64::MAX`
fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

/// Pick the terminal outcome of a run
fn finish(
    report: ExtractionReport,
    dispatch: DispatchSummary,
    written: WriterSummary,
) -> Result<ExtractionReport, ExtractError> {
    let write_failures = written.failures.len();

    if let Some((line, source)) = dispatch.read_error {
        if let Some(unit_error) = &dispatch.unit_error {
            warn!("Superseded by read failure: {}", unit_error);
        }
        if write_failures > 0 {
            warn!("Superseded by read failure: {} failed writes", write_failures);
        }
        return Err(ExtractError::SourceRead { line, source });
    }

    if let Some(unit_error) = dispatch.unit_error {
        if write_failures > 0 {
            warn!("Superseded by unit failure: {} failed writes", write_failures);
        }
        return Err(ExtractError::Worker(unit_error));
    }

    if let Some(first) = written.failures.into_iter().min_by_key(|f| f.line) {
        let first_line = first.line + 1;
        error!(
            "{} accepted lines were not written, first at line {}",
            write_failures, first_line
        );
        return Err(ExtractError::PartialWrite {
            failed: write_failures,
            first_line,
            first_error: first.error,
        });
    }

    info!(
        "Extraction complete: {} read, {} accepted, {} written in {} ms",
        report.lines_read, report.lines_accepted, report.lines_written, report.elapsed_ms
    );

    Ok(report)
}
