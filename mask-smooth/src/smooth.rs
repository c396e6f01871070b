//! The smoothing engine.

use mask_types::SurfaceMesh;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adjacency::VertexAdjacency;
use crate::backend::ComputeBackend;
use crate::error::SmoothResult;

/// Relaxation algorithm selector.
///
/// Deserializes from the lowercase names used in configuration files;
/// `"off"`, `"disable"` and `"disabled"` are accepted aliases for `"none"`.
/// Because this is a closed enum, an unknown method string is rejected at
/// configuration load and can never reach the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmoothMethod {
    /// `v <- v + weight * L(v)` per iteration.
    #[default]
    Laplacian,

    /// Shrink (`lambda`) then inflate (`mu`) sub-steps per iteration.
    Taubin,

    /// Smoothing disabled; the engine returns input positions unchanged.
    #[serde(alias = "off", alias = "disable", alias = "disabled")]
    None,
}

/// Parameters for one smoothing invocation.
///
/// # Example
///
/// ```
/// use mask_smooth::{SmoothMethod, SmoothParams};
///
/// let params = SmoothParams::taubin(10).with_device("threads");
/// assert_eq!(params.method, SmoothMethod::Taubin);
/// assert_eq!(params.iterations, 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothParams {
    /// The relaxation algorithm.
    pub method: SmoothMethod,

    /// Number of iterations. Zero makes the call a no-op.
    pub iterations: u32,

    /// Laplacian damping factor in `[0, 1]`. Values near 1 converge fast
    /// but overshoot; values near 0 converge slowly.
    pub weight: f64,

    /// Taubin shrink factor (positive).
    pub lambda: f64,

    /// Taubin inflate factor (conventionally negative, `|mu| > lambda`).
    pub mu: f64,

    /// Compute device selector (see [`ComputeBackend::resolve`]).
    pub device: String,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self {
            method: SmoothMethod::Laplacian,
            iterations: 10,
            weight: 0.1,
            lambda: 0.5,
            mu: -0.53,
            device: "cpu".to_string(),
        }
    }
}

impl SmoothParams {
    /// Laplacian smoothing with the default damping weight.
    #[must_use]
    pub fn laplacian(iterations: u32) -> Self {
        Self {
            method: SmoothMethod::Laplacian,
            iterations,
            ..Self::default()
        }
    }

    /// Taubin smoothing with the canonical `(0.5, -0.53)` factor pair.
    #[must_use]
    pub fn taubin(iterations: u32) -> Self {
        Self {
            method: SmoothMethod::Taubin,
            iterations,
            ..Self::default()
        }
    }

    /// Set the compute device selector.
    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    /// Set the Laplacian damping weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the Taubin factor pair.
    #[must_use]
    pub fn with_taubin_factors(mut self, lambda: f64, mu: f64) -> Self {
        self.lambda = lambda;
        self.mu = mu;
        self
    }
}

/// Smooth a mesh's vertex positions, leaving its faces untouched.
///
/// Returns a new position buffer with the same count and ordering as the
/// input vertices. The adjacency graph and degree normalization are built
/// once and reused across all iterations; only positions move.
///
/// A `method` of [`SmoothMethod::None`] or an iteration count of zero is a
/// no-op returning the input positions unchanged, without touching the
/// compute device.
///
/// # Errors
///
/// Returns [`crate::SmoothError::BackendUnavailable`] when the configured
/// device cannot be resolved.
pub fn smooth_vertices(
    mesh: &SurfaceMesh,
    params: &SmoothParams,
) -> SmoothResult<Vec<Point3<f32>>> {
    let mut positions = mesh.vertices.clone();

    if params.method == SmoothMethod::None || params.iterations == 0 {
        debug!("smoothing disabled, returning positions unchanged");
        return Ok(positions);
    }

    let backend = ComputeBackend::resolve(&params.device)?;
    let adjacency = VertexAdjacency::from_faces(&mesh.faces, mesh.vertices.len());

    info!(
        method = ?params.method,
        iterations = params.iterations,
        vertices = positions.len(),
        backend = ?backend,
        "smoothing surface"
    );

    match params.method {
        SmoothMethod::None => {}
        SmoothMethod::Laplacian => {
            let weight = params.weight as f32;
            for _ in 0..params.iterations {
                apply_step(&mut positions, &adjacency, backend, weight);
            }
        }
        SmoothMethod::Taubin => {
            let lambda = params.lambda as f32;
            let mu = params.mu as f32;
            for _ in 0..params.iterations {
                apply_step(&mut positions, &adjacency, backend, lambda);
                apply_step(&mut positions, &adjacency, backend, mu);
            }
        }
    }

    Ok(positions)
}

/// One `v <- v + factor * L(v)` pass over all vertices.
fn apply_step(
    positions: &mut [Point3<f32>],
    adjacency: &VertexAdjacency,
    backend: ComputeBackend,
    factor: f32,
) {
    let displacements = backend.laplacian(positions, adjacency);
    for (p, d) in positions.iter_mut().zip(displacements) {
        p.coords += d * factor;
    }
}
