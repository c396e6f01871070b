//! The mask-to-mesh pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use nalgebra::Point3;
use tracing::{debug, info};

use mask_extract::{extract_surface, resample_to_spacing};
use mask_io::{load_mask, save_obj};
use mask_smooth::smooth_vertices;
use mask_types::{validate_non_empty, validate_shape, SurfaceMesh};

use crate::config::MeshConfig;
use crate::error::PipelineResult;
use crate::progress::{PipelineStage, Progress};

/// Everything the compute stages produce for one run.
#[derive(Debug, Clone)]
pub struct MeshArtifacts {
    /// The raw extracted mesh.
    pub mesh: SurfaceMesh,

    /// Smoothed vertex positions, present only when smoothing actually ran.
    /// Faces are shared with [`MeshArtifacts::mesh`]; smoothing never
    /// changes topology.
    pub smoothed: Option<Vec<Point3<f32>>>,
}

impl MeshArtifacts {
    /// The smoothed mesh if smoothing ran, otherwise the raw mesh.
    ///
    /// This is the "best available" surface, backing the output fallback
    /// policy for the smoothed destination path.
    #[must_use]
    pub fn best_vertices(&self) -> &[Point3<f32>] {
        self.smoothed.as_deref().unwrap_or(&self.mesh.vertices)
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Vertex count of the extracted mesh.
    pub vertex_count: usize,

    /// Face count of the extracted mesh.
    pub face_count: usize,

    /// Whether smoothing actually ran.
    pub smoothed: bool,

    /// Paths written, in write order.
    pub written: Vec<PathBuf>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mesh: {} vertices, {} faces ({}), {} file(s) written",
            self.vertex_count,
            self.face_count,
            if self.smoothed { "smoothed" } else { "unsmoothed" },
            self.written.len()
        )
    }
}

/// Run the compute stages: load through smooth, no file output.
///
/// Stage order is `Load -> Validate -> (Resample?) -> Binarize -> Extract
/// -> (Smooth?)`. The resample stage is skipped when
/// `target_resolution_mm` is `null`; the smooth stage is skipped unless
/// `smooth.enabled`, `num_iter > 0` and `weight > 0` all hold. Skipped
/// stages still notify the observer, keeping the reported step count
/// stable.
///
/// # Errors
///
/// Any stage failure aborts the run; see [`crate::PipelineError`].
pub fn generate_mesh<P: AsRef<Path>>(
    input: P,
    config: &MeshConfig,
    progress: &mut dyn Progress,
) -> PipelineResult<MeshArtifacts> {
    let input = input.as_ref();

    progress.on_stage(PipelineStage::Load);
    let mut mask = load_mask(input, config.reorient_canonical)?;
    debug!(shape = ?mask.shape(), spacing = ?mask.spacing(), "mask loaded");

    progress.on_stage(PipelineStage::Validate);
    validate_shape(&mask)?;
    validate_non_empty(&mask)?;

    progress.on_stage(PipelineStage::Resample);
    if let Some(target_mm) = config.target_resolution_mm {
        mask = resample_to_spacing(&mask, target_mm)?;
    }

    progress.on_stage(PipelineStage::Extract);
    let binary = mask.binarized();
    let mesh = extract_surface(&binary)?;

    progress.on_stage(PipelineStage::Smooth);
    let smoothed = if config.smooth.should_smooth() {
        Some(smooth_vertices(&mesh, &config.smooth.to_params())?)
    } else {
        debug!("smoothing skipped by configuration");
        None
    };

    progress.on_finished();
    Ok(MeshArtifacts { mesh, smoothed })
}

/// Run the full pipeline and write the configured outputs.
///
/// Each output write is an independent step performed only after every
/// compute stage has succeeded. A configured smoothed path receives the
/// unsmoothed mesh when smoothing was skipped.
///
/// # Errors
///
/// Any stage or write failure aborts the run; see [`crate::PipelineError`].
pub fn run<P: AsRef<Path>>(
    input: P,
    config: &MeshConfig,
    progress: &mut dyn Progress,
) -> PipelineResult<RunSummary> {
    config.validate()?;

    let artifacts = generate_mesh(input, config, progress)?;

    info!(
        vertices = artifacts.mesh.vertex_count(),
        faces = artifacts.mesh.face_count(),
        smoothed = artifacts.smoothed.is_some(),
        "mesh generated"
    );

    let mut written = Vec::new();
    if let Some(path) = &config.output.mesh_unsmoothed_path {
        save_obj(path, &artifacts.mesh.vertices, &artifacts.mesh.faces)?;
        info!(path = %path.display(), "wrote unsmoothed mesh");
        written.push(path.clone());
    }
    if let Some(path) = &config.output.mesh_smoothed_path {
        save_obj(path, artifacts.best_vertices(), &artifacts.mesh.faces)?;
        info!(
            path = %path.display(),
            fallback = artifacts.smoothed.is_none(),
            "wrote smoothed mesh"
        );
        written.push(path.clone());
    }

    Ok(RunSummary {
        vertex_count: artifacts.mesh.vertex_count(),
        face_count: artifacts.mesh.face_count(),
        smoothed: artifacts.smoothed.is_some(),
        written,
    })
}
