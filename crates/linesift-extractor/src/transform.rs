//! The per-line transformer seam

use crate::types::TransformResult;

/// Decides, per line, whether to keep it and what to write instead
///
/// Receives the line with its terminator already stripped. Implementations
/// must be total: every line yields a [`TransformResult`]. Lines are
/// transformed concurrently, so no call may depend on another line.
///
/// Any `Fn(&str) -> TransformResult` closure is a transformer.
pub trait LineTransformer: Send + Sync + 'static {
    /// Transform one line
    fn transform(&self, line: &str) -> TransformResult;
}

impl<F> LineTransformer for F
where
    F: Fn(&str) -> TransformResult + Send + Sync + 'static,
{
    fn transform(&self, line: &str) -> TransformResult {
        self(line)
    }
}
