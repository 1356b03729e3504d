//! Newline-delimited line reader

use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Strip a trailing `\n` and a `\r` before it
pub(crate) fn strip_terminator(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

/// Reads one line at a time, reusing a single buffer
pub(crate) struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    lines_read: u64,
}

impl<R> LineReader<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            lines_read: 0,
        }
    }

    /// Next line without its terminator, or `None` at end-of-stream.
    ///
    /// A trailing line with no terminator is still returned. Invalid UTF-8 is
    /// replaced rather than rejected.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        let n = self.inner.read_until(b'\n', &mut self.buf).await?;
        if n == 0 {
            return Ok(None);
        }
        self.lines_read += 1;
        Ok(Some(
            String::from_utf8_lossy(strip_terminator(&self.buf)).into_owned(),
        ))
    }

    /// Lines returned so far
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}
