//! Error types for the smoothing engine.

use thiserror::Error;

/// Result type for smoothing operations.
pub type SmoothResult<T> = Result<T, SmoothError>;

/// Errors that can occur during surface smoothing.
#[derive(Debug, Error)]
pub enum SmoothError {
    /// The configured compute device is not available.
    #[error("compute backend unavailable: \"{device}\" (supported: cpu, threads)")]
    BackendUnavailable {
        /// The requested device string.
        device: String,
    },
}
