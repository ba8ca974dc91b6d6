//! Error types for determinant computation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a matrix or computing its determinant.
///
/// Every variant aborts the current computation; nothing is retried.
#[derive(Debug, Error)]
pub enum DeterminantError {
    /// The matrix text is not a well-formed square matrix.
    #[error("malformed matrix input at line {line}: {reason}")]
    MalformedInput {
        /// 1-based line of the offending input (0 when no line applies)
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// The requested worker count cannot partition a matrix of this order.
    #[error("invalid partition: {workers} workers for a matrix of order {order} (expected 1..={order})")]
    InvalidPartition {
        /// Requested worker count
        workers: usize,
        /// Order of the matrix
        order: usize,
    },

    /// A minor was requested outside the bounds of the matrix.
    #[error("invalid minor: {reason}")]
    InvalidMinor {
        /// Which precondition failed
        reason: String,
    },

    /// A worker did not deliver its assigned minors.
    #[error("worker failure: {reason}")]
    WorkerFailure {
        /// Panic message, duplicate slot, or the list of unwritten slots
        reason: String,
    },

    /// The matrix file could not be read.
    #[error("failed to read matrix file {}: {source}", path.display())]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl DeterminantError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_minor(reason: impl Into<String>) -> Self {
        Self::InvalidMinor {
            reason: reason.into(),
        }
    }

    pub(crate) fn worker_failure(reason: impl Into<String>) -> Self {
        Self::WorkerFailure {
            reason: reason.into(),
        }
    }
}

/// Result type for the computational core
pub type DetResult<T> = std::result::Result<T, DeterminantError>;
