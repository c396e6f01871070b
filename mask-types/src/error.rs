//! Error types for mask validation and construction.

use thiserror::Error;

/// Result type for mask operations.
pub type MaskResult<T> = Result<T, MaskError>;

/// Errors raised by mask construction and validation.
#[derive(Debug, Error)]
pub enum MaskError {
    /// Mask does not have exactly three dimensions.
    #[error("expected a 3-D mask, got shape {shape:?}")]
    NotThreeDimensional {
        /// The actual shape of the offending mask.
        shape: Vec<usize>,
    },

    /// Mask contains no foreground voxels.
    #[error("mask contains no foreground voxels (no value == 1)")]
    EmptyMask,

    /// Voxel buffer length does not match the declared shape.
    #[error("voxel data length mismatch: shape {shape:?} needs {expected} values, got {actual}")]
    DataLength {
        /// The declared shape.
        shape: Vec<usize>,
        /// Number of voxels the shape implies.
        expected: usize,
        /// Number of voxels actually provided.
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_error_reports_actual_shape() {
        let err = MaskError::NotThreeDimensional {
            shape: vec![4, 4, 4, 2],
        };
        assert_eq!(format!("{err}"), "expected a 3-D mask, got shape [4, 4, 4, 2]");
    }

    #[test]
    fn empty_mask_error_message() {
        let err = MaskError::EmptyMask;
        assert!(format!("{err}").contains("no foreground"));
    }

    #[test]
    fn data_length_error_message() {
        let err = MaskError::DataLength {
            shape: vec![2, 2, 2],
            expected: 8,
            actual: 7,
        };
        let msg = format!("{err}");
        assert!(msg.contains('8'));
        assert!(msg.contains('7'));
    }
}
