//! Core data types for the maskmesh pipeline.
//!
//! This crate provides the two data structures every other maskmesh crate
//! operates on, plus the boundary validation applied to incoming masks:
//!
//! - [`VoxelMask`] - A labeled volumetric grid with physical voxel spacing
//! - [`SurfaceMesh`] - An indexed triangle mesh in millimeter coordinates
//! - [`validate_shape`] / [`validate_non_empty`] - Mask invariants checked
//!   before any expensive work proceeds
//!
//! # Binarity Policy
//!
//! A mask is *trusted* to be binary once it passes validation; the validator
//! deliberately checks only shape and non-emptiness. Strict {0,1} content is
//! produced by [`VoxelMask::binarized`], which treats any value other than
//! exactly 1 as background. Stray non-binary values therefore never fail the
//! pipeline; they vanish at the binarize step.
//!
//! # Example
//!
//! ```
//! use mask_types::{validate_non_empty, validate_shape, VoxelMask};
//!
//! let mut mask = VoxelMask::zeros([10, 10, 10], [1.0, 1.0, 1.0]);
//! mask.set(5, 5, 5, 1);
//!
//! validate_shape(&mask).unwrap();
//! validate_non_empty(&mask).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

mod error;
mod mesh;
mod validate;
mod volume;

pub use error::{MaskError, MaskResult};
pub use mesh::SurfaceMesh;
pub use validate::{validate_non_empty, validate_shape};
pub use volume::{VoxelMask, FOREGROUND};
