use std::collections::TryReserveError;

use thiserror::Error;

/// Failures of a single compaction invocation. Contract violations
/// (mismatched domain volumes) are debug assertions, not error variants, and
/// degenerate zero-volume input is not an error at all. An invocation is
/// atomic: it either produces the full compacted buffer or fails outright.
#[derive(Debug, Error)]
pub enum CompactError {
    #[error("failed to allocate output buffer of {elements} elements: {source}")]
    OutputAlloc {
        elements: usize,
        source: TryReserveError,
    },
}
