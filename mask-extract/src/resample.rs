//! Nearest-neighbor resampling of label grids.

use mask_types::VoxelMask;
use tracing::debug;

use crate::error::{ExtractError, ExtractResult};

/// Resample a label mask to a target voxel spacing.
///
/// The zoom factor per axis is `current_spacing / target_spacing`; the
/// output extent is `round(n * factor)`, floored at 1 voxel. Lookup is
/// nearest-neighbor (order 0) so discrete label values survive unchanged -
/// any interpolating order would blend labels and corrupt the binary
/// invariant. The returned mask carries the target spacing verbatim.
///
/// Resampling to the current spacing is an exact identity.
///
/// # Errors
///
/// Returns [`ExtractError::NotVolumetric`] for non-3D masks and
/// [`ExtractError::InvalidScale`] when a target spacing yields a
/// non-finite or non-positive factor. Target positivity is deliberately
/// not pre-validated anywhere else; this is where a bad value surfaces.
pub fn resample_to_spacing(mask: &VoxelMask, target_mm: [f64; 3]) -> ExtractResult<VoxelMask> {
    let Some((nx, ny, nz)) = mask.dims() else {
        return Err(ExtractError::NotVolumetric { rank: mask.rank() });
    };

    let spacing = mask.spacing();
    let mut factors = [0.0_f64; 3];
    for axis in 0..3 {
        let factor = spacing[axis] / target_mm[axis];
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ExtractError::InvalidScale {
                axis,
                factor,
                current: spacing[axis],
                target: target_mm[axis],
            });
        }
        factors[axis] = factor;
    }

    let dims = [nx, ny, nz];
    let mut out_dims = [0_usize; 3];
    for axis in 0..3 {
        out_dims[axis] = ((dims[axis] as f64 * factors[axis]).round() as usize).max(1);
    }

    debug!(
        from = ?dims,
        to = ?out_dims,
        ?factors,
        "resampling mask"
    );

    let mut out = VoxelMask::zeros(out_dims, target_mm);
    for axis_z in 0..out_dims[2] {
        let sz = source_index(axis_z, out_dims[2], dims[2]);
        for axis_y in 0..out_dims[1] {
            let sy = source_index(axis_y, out_dims[1], dims[1]);
            for axis_x in 0..out_dims[0] {
                let sx = source_index(axis_x, out_dims[0], dims[0]);
                out.set(axis_x, axis_y, axis_z, mask.get(sx, sy, sz));
            }
        }
    }

    Ok(out)
}

/// Map an output index to its nearest source index (half-sample centers,
/// clamped at the borders). Exact identity when `out_n == in_n`.
fn source_index(i: usize, out_n: usize, in_n: usize) -> usize {
    let ratio = in_n as f64 / out_n as f64;
    let src = ((i as f64 + 0.5) * ratio - 0.5).round();
    (src.max(0.0) as usize).min(in_n - 1)
}
