// SPDX-License-Identifier: MIT
// Errors surfaced by the streaming resampler. All of them are fatal for the
// resize in progress; degenerate weight sums are handled locally and never
// reach this type.

use crate::scanline::CodecError;

#[derive(Debug)]
pub enum ResampleError {
    /// Source reported end-of-stream before delivering `row`.
    Truncated { row: usize },
    /// Source failed while decoding `row`.
    Source { row: usize, source: CodecError },
    /// Sink rejected output row `row`.
    Sink { row: usize, source: CodecError },
    /// Channel count the pipeline cannot carry.
    UnsupportedChannels(usize),
    /// Cursor asked to go back to a row it already consumed.
    RowRewind { requested: usize, next: usize },
}

impl std::fmt::Display for ResampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResampleError::Truncated { row } => {
                write!(f, "Source image corrupted at line {}: stream ended early", row)
            }
            ResampleError::Source { row, source } => {
                write!(f, "Source image corrupted at line {}: {}", row, source)
            }
            ResampleError::Sink { row, source } => {
                write!(f, "Failed to write output line {}: {}", row, source)
            }
            ResampleError::UnsupportedChannels(n) => {
                write!(f, "Unsupported channel count: {}", n)
            }
            ResampleError::RowRewind { requested, next } => write!(
                f,
                "Source row {} requested after row {} was already consumed",
                requested,
                next.saturating_sub(1)
            ),
        }
    }
}

impl std::error::Error for ResampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResampleError::Source { source, .. } | ResampleError::Sink { source, .. } => {
                Some(source.as_ref())
            }
            _ => None,
        }
    }
}
