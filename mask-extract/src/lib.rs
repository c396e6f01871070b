//! Grid resampling and surface extraction for the maskmesh pipeline.
//!
//! Two independent transformations that both consume a [`mask_types::VoxelMask`]:
//!
//! - [`resample_to_spacing`] - Nearest-neighbor resampling of a label grid
//!   to a target physical voxel spacing
//! - [`extract_surface`] - Isosurface extraction from a strictly binary
//!   grid, producing an indexed triangle mesh in millimeter coordinates
//!
//! # Extraction Convention
//!
//! The surface is extracted at the 0.5 level, the midpoint between
//! background (0) and foreground (1): generated geometry always lies
//! strictly between labeled and unlabeled voxels. Because the input is
//! boolean, extraction uses a dual (Surface Nets) formulation, which is
//! deterministic and free of the ambiguous cube configurations tri-table
//! marching cubes suffers from when there is no scalar field to
//! interpolate.

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

mod error;
mod resample;
mod surface;

pub use error::{ExtractError, ExtractResult};
pub use resample::resample_to_spacing;
pub use surface::extract_surface;
