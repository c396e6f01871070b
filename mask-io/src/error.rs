//! Error types for volume and mesh I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while reading or writing files.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// File content is not a usable NIfTI-1 volume.
    #[error("invalid NIfTI header: {reason}")]
    InvalidHeader {
        /// Description of what was invalid.
        reason: String,
    },

    /// NIfTI data type this reader does not handle.
    #[error("unsupported NIfTI data type code {code}")]
    UnsupportedDataType {
        /// The `datatype` header field value.
        code: i16,
    },

    /// Voxel payload is shorter than the header promises.
    #[error("truncated voxel data: expected {expected} bytes, got {actual}")]
    TruncatedData {
        /// Bytes required by the header.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// Attempted to write a mask that is not rank 3.
    #[error("only 3-D masks can be written, got rank {rank}")]
    NotVolumetric {
        /// Rank of the offending mask.
        rank: usize,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Create an `InvalidHeader` error with the given reason.
    #[must_use]
    pub fn invalid_header(reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            reason: reason.into(),
        }
    }
}
