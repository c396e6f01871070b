//! Compute backend selection for the smoothing iteration.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::adjacency::VertexAdjacency;
use crate::error::{SmoothError, SmoothResult};

/// Where the per-iteration Laplacian gather executes.
///
/// Backends differ only in scheduling, never in arithmetic: each vertex is
/// reduced independently with the same summation order, so results are
/// identical across backends. An unrecognized device string is an error at
/// the point smoothing is attempted - there is deliberately no silent
/// fallback to a different device.
///
/// # Example
///
/// ```
/// use mask_smooth::ComputeBackend;
///
/// assert_eq!(ComputeBackend::resolve("cpu").unwrap(), ComputeBackend::Serial);
/// assert_eq!(ComputeBackend::resolve("threads").unwrap(), ComputeBackend::Threads);
/// assert!(ComputeBackend::resolve("cuda:0").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeBackend {
    /// Single-threaded gather.
    Serial,

    /// Data-parallel gather on the rayon thread pool.
    Threads,
}

impl ComputeBackend {
    /// Resolve a device selector string to a backend.
    ///
    /// # Errors
    ///
    /// Returns [`SmoothError::BackendUnavailable`] for anything other than
    /// `"cpu"` or `"threads"` (case-insensitive).
    pub fn resolve(device: &str) -> SmoothResult<Self> {
        match device.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Serial),
            "threads" => Ok(Self::Threads),
            _ => Err(SmoothError::BackendUnavailable {
                device: device.to_string(),
            }),
        }
    }

    /// Compute the Laplacian displacement `L(v) = mean(neighbors) - v` for
    /// every vertex.
    ///
    /// The mean divides the neighbor sum by `max(degree, epsilon)`, so an
    /// isolated vertex sees a zero neighbor mean.
    #[must_use]
    pub(crate) fn laplacian(
        self,
        positions: &[Point3<f32>],
        adjacency: &VertexAdjacency,
    ) -> Vec<Vector3<f32>> {
        let step = |i: usize| -> Vector3<f32> {
            let sum: Vector3<f32> = adjacency
                .neighbors(i)
                .iter()
                .map(|&n| positions[n as usize].coords)
                .sum();
            sum * adjacency.inv_degree(i) - positions[i].coords
        };

        match self {
            Self::Serial => (0..positions.len()).map(step).collect(),
            Self::Threads => (0..positions.len()).into_par_iter().map(step).collect(),
        }
    }
}
