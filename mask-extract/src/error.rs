//! Error types for resampling and surface extraction.

use thiserror::Error;

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors that can occur during resampling or surface extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Input mask is not rank 3.
    #[error("operation needs a 3-D mask, got rank {rank}")]
    NotVolumetric {
        /// Rank of the offending mask.
        rank: usize,
    },

    /// Resampling factor is unusable (zero, negative or non-finite target).
    #[error("invalid resampling scale on axis {axis}: factor {factor} (current {current} mm, target {target} mm)")]
    InvalidScale {
        /// Axis index (0 = x, 1 = y, 2 = z).
        axis: usize,
        /// The computed zoom factor.
        factor: f64,
        /// Current spacing on that axis.
        current: f64,
        /// Requested spacing on that axis.
        target: f64,
    },

    /// Extraction produced no geometry.
    #[error("surface extraction produced no triangles")]
    EmptySurface,
}
