//! Single writer task that owns the destination

use crate::config::OutputOrder;
use crate::types::LineOutcome;
use std::collections::BTreeMap;
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

const DEFAULT_BATCH_BYTES: usize = 8 * 1024;

/// An accepted line that did not reach the destination
#[derive(Debug)]
pub(crate) struct WriteFailure {
    /// Zero-based source line index
    pub line: u64,
    pub error: io::Error,
}

/// What the writer did over a run
#[derive(Debug, Default)]
pub(crate) struct WriterSummary {
    pub lines_written: u64,
    pub bytes_written: u64,
    pub failures: Vec<WriteFailure>,
}

/// Batches records and only counts them once the sink has flushed them
struct LineWriter<W: AsyncWrite + Unpin> {
    sink: W,
    batch: Vec<u8>,
    batch_lines: Vec<u64>,
    batch_bytes: usize,
    summary: WriterSummary,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    fn new(sink: W, batch_bytes: usize) -> Self {
        Self {
            sink,
            batch: Vec::with_capacity(batch_bytes),
            batch_lines: Vec::new(),
            batch_bytes,
            summary: WriterSummary::default(),
        }
    }

    async fn write_line(&mut self, index: u64, text: String) {
        self.batch.extend_from_slice(text.as_bytes());
        self.batch.push(b'\n');
        self.batch_lines.push(index);

        if self.batch.len() >= self.batch_bytes {
            self.flush_batch().await;
        }
    }

    async fn flush_batch(&mut self) {
        if self.batch_lines.is_empty() {
            return;
        }

        let result = match self.sink.write_all(&self.batch).await {
            Ok(()) => self.sink.flush().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.summary.lines_written += self.batch_lines.len() as u64;
                self.summary.bytes_written += self.batch.len() as u64;
            }
            Err(error) => {
                // Part of the batch may have landed; none of it is counted
                warn!(
                    "Failed to write {} lines starting at line {}: {}",
                    self.batch_lines.len(),
                    self.batch_lines[0] + 1,
                    error
                );
                let kind = error.kind();
                let message = error.to_string();
                let mut error = Some(error);
                for &line in &self.batch_lines {
                    let error = error
                        .take()
                        .unwrap_or_else(|| io::Error::new(kind, message.clone()));
                    self.summary.failures.push(WriteFailure { line, error });
                }
            }
        }

        self.batch.clear();
        self.batch_lines.clear();
    }

    async fn finish(mut self) -> WriterSummary {
        self.flush_batch().await;
        if let Err(error) = self.sink.shutdown().await {
            debug!("Destination shutdown reported: {}", error);
        }
        self.summary
    }
}

/// Drain `outcomes` into `sink` until every sender is dropped.
///
/// With [`OutputOrder::Preserve`] results are held until every earlier index
/// has arrived. Every dispatched line reports its index, failed ones included,
/// so the reorder buffer never waits on a gap.
pub(crate) async fn run_writer<W>(
    sink: W,
    mut outcomes: mpsc::Receiver<LineOutcome>,
    order: OutputOrder,
    buffer_bytes: usize,
) -> WriterSummary
where
    W: AsyncWrite + Unpin,
{
    let batch_bytes = if buffer_bytes > 0 {
        buffer_bytes
    } else {
        DEFAULT_BATCH_BYTES
    };
    let mut writer = LineWriter::new(sink, batch_bytes);

    debug!("Writer started ({} output)", order);

    match order {
        OutputOrder::Unordered => {
            while let Some(outcome) = outcomes.recv().await {
                if let Some(text) = outcome.text {
                    writer.write_line(outcome.index, text).await;
                }
            }
        }
        OutputOrder::Preserve => {
            let mut pending: BTreeMap<u64, Option<String>> = BTreeMap::new();
            let mut next = 0u64;

            while let Some(outcome) = outcomes.recv().await {
                pending.insert(outcome.index, outcome.text);
                while let Some(text) = pending.remove(&next) {
                    if let Some(text) = text {
                        writer.write_line(next, text).await;
                    }
                    next += 1;
                }
            }

            // Only reachable when dispatch stopped early
            if !pending.is_empty() {
                debug!("Writing {} results after a gap at line {}", pending.len(), next + 1);
            }
            for (index, text) in pending {
                if let Some(text) = text {
                    writer.write_line(index, text).await;
                }
            }
        }
    }

    let summary = writer.finish().await;
    debug!(
        "Writer finished: {} lines, {} bytes, {} failures",
        summary.lines_written,
        summary.bytes_written,
        summary.failures.len()
    );
    summary
}
