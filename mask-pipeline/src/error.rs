//! Pipeline error type.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Any failure that can abort a pipeline run.
///
/// No stage retries: the first error is surfaced to the caller with the
/// offending value and expected constraint in its message.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration failed to load or validate.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Volume or mesh I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] mask_io::IoError),

    /// Mask validation failed.
    #[error("mask validation error: {0}")]
    Mask(#[from] mask_types::MaskError),

    /// Resampling or surface extraction failed.
    #[error("extraction error: {0}")]
    Extract(#[from] mask_extract::ExtractError),

    /// Smoothing failed.
    #[error("smoothing error: {0}")]
    Smooth(#[from] mask_smooth::SmoothError),
}
