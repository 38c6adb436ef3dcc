//! Error types for AVI container restructuring

use crate::chunks::FourCC;
use thiserror::Error;

/// Result type for container operations
pub type Result<T> = std::result::Result<T, AviError>;

/// Errors that can occur while parsing, transforming, or writing a container.
///
/// Soft conditions (nothing to redistribute, anomaly below threshold,
/// ambiguous tail layout) are not errors: the transforms return a zero delta
/// and log a diagnostic instead.
#[derive(Error, Debug)]
pub enum AviError {
    /// IO error during read/write
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Root record does not start with a RIFF tag
    #[error("invalid RIFF header")]
    InvalidRiff,

    /// Truncated header, or a declared size exceeding the remaining bytes
    #[error("truncated container: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    /// Mandatory list (the movi stream data) absent
    #[error("missing mandatory list: {0}")]
    MissingList(&'static str),

    /// Writer recomputed a node's content length and it disagrees with the
    /// declared size, which means a transform mis-tracked its byte delta
    #[error("size mismatch in '{tag}': declared {declared}, recomputed {actual}")]
    SizeMismatch {
        tag: FourCC,
        declared: u32,
        actual: u64,
    },

    /// Transform invoked on the wrong kind of node
    #[error("transform precondition violated: expected {expected}, found {found}")]
    Precondition {
        expected: &'static str,
        found: String,
    },
}
