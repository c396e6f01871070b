//! Boundary validation for incoming masks.
//!
//! Both checks run before any expensive pipeline work. Neither inspects the
//! full value distribution: binarity is trusted, not verified (stray labels
//! are silently dropped later by [`VoxelMask::binarized`]).

use crate::error::{MaskError, MaskResult};
use crate::volume::{VoxelMask, FOREGROUND};

/// Require the mask to have exactly three dimensions.
///
/// # Errors
///
/// Returns [`MaskError::NotThreeDimensional`] reporting the actual shape.
pub fn validate_shape(mask: &VoxelMask) -> MaskResult<()> {
    if mask.rank() == 3 {
        Ok(())
    } else {
        Err(MaskError::NotThreeDimensional {
            shape: mask.shape().to_vec(),
        })
    }
}

/// Require at least one voxel with the foreground label.
///
/// # Errors
///
/// Returns [`MaskError::EmptyMask`] if no voxel equals 1.
pub fn validate_non_empty(mask: &VoxelMask) -> MaskResult<()> {
    if mask.values().iter().any(|&v| v == FOREGROUND) {
        Ok(())
    } else {
        Err(MaskError::EmptyMask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_mask_passes_both_checks() {
        let mut mask = VoxelMask::zeros([10, 10, 10], [1.0, 1.0, 1.0]);
        for z in 3..6 {
            for y in 3..6 {
                for x in 3..6 {
                    mask.set(x, y, z, 1);
                }
            }
        }

        assert!(validate_shape(&mask).is_ok());
        assert!(validate_non_empty(&mask).is_ok());
    }

    #[test]
    fn four_dimensional_mask_fails_shape_check() {
        let mask = VoxelMask::from_parts(vec![1; 16], vec![2, 2, 2, 2], [1.0, 1.0, 1.0])
            .expect("length matches shape");

        let err = validate_shape(&mask).unwrap_err();
        match err {
            MaskError::NotThreeDimensional { shape } => assert_eq!(shape, vec![2, 2, 2, 2]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn two_dimensional_mask_fails_shape_check() {
        let mask = VoxelMask::from_parts(vec![1; 25], vec![5, 5], [1.0, 1.0, 1.0])
            .expect("length matches shape");
        assert!(validate_shape(&mask).is_err());
    }

    #[test]
    fn reported_shape_matches_input_exactly() {
        let mask = VoxelMask::from_parts(vec![0; 30], vec![5, 6], [1.0, 1.0, 1.0])
            .expect("length matches shape");
        let msg = format!("{}", validate_shape(&mask).unwrap_err());
        assert!(msg.contains("[5, 6]"), "message was: {msg}");
    }

    #[test]
    fn all_background_fails_non_empty_check() {
        let mask = VoxelMask::zeros([5, 5, 5], [1.0, 1.0, 1.0]);
        assert!(matches!(
            validate_non_empty(&mask),
            Err(MaskError::EmptyMask)
        ));
    }

    #[test]
    fn non_binary_values_do_not_count_as_foreground() {
        // Only exact 1s are foreground; a mask full of 2s is still "empty".
        let mut mask = VoxelMask::zeros([3, 3, 3], [1.0, 1.0, 1.0]);
        mask.set(0, 0, 0, 2);
        assert!(validate_non_empty(&mask).is_err());

        mask.set(1, 1, 1, 1);
        assert!(validate_non_empty(&mask).is_ok());
    }

    #[test]
    fn shape_check_does_not_inspect_values() {
        // A rank-3 mask with wild values still passes the shape check; the
        // validator trusts binarity by design.
        let mut mask = VoxelMask::zeros([3, 3, 3], [1.0, 1.0, 1.0]);
        mask.set(2, 2, 2, 200);
        assert!(validate_shape(&mask).is_ok());
    }
}
