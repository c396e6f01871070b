//! Iterative surface relaxation over a vertex-adjacency graph.
//!
//! Smoothing low-pass-filters the staircase artifacts of voxel-derived
//! surfaces by repeatedly moving each vertex toward the centroid of its
//! topological neighbors:
//!
//! - **Laplacian** - `v <- v + weight * L(v)`, simple and fast, shrinks
//!   volume over many iterations
//! - **Taubin** - a shrink step with `lambda > 0` followed by an inflate
//!   step with `mu < 0` per iteration, attenuating noise while resisting
//!   volume loss (Taubin, SIGGRAPH 1995)
//!
//! where `L(v) = mean(neighbor positions) - v` over the adjacency graph
//! derived from the triangle faces.
//!
//! The per-iteration gather runs on a selectable compute backend
//! ([`ComputeBackend`]): serial, or data-parallel via rayon. Backends are
//! numerically equivalent; an unrecognized device string fails rather than
//! silently falling back.
//!
//! # Example
//!
//! ```
//! use mask_smooth::{smooth_vertices, SmoothParams};
//! use mask_types::SurfaceMesh;
//! use nalgebra::Point3;
//!
//! let mut mesh = SurfaceMesh::new();
//! mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(0.5, 1.0, 0.2));
//! mesh.faces.push([0, 1, 2]);
//!
//! let params = SmoothParams::default();
//! let smoothed = smooth_vertices(&mesh, &params).unwrap();
//! assert_eq!(smoothed.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

mod adjacency;
mod backend;
mod error;
mod smooth;

pub use adjacency::VertexAdjacency;
pub use backend::ComputeBackend;
pub use error::{SmoothError, SmoothResult};
pub use smooth::{smooth_vertices, SmoothMethod, SmoothParams};
