//! Stage-boundary progress reporting.
//!
//! Progress is an observable side effect only, never part of the data
//! contract: observers are notified as each stage begins (including
//! stages that turn out to be skips) and once at the end of the run.

/// The five reported pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Reading the input volume.
    Load,
    /// Shape and non-emptiness validation.
    Validate,
    /// Resampling to the target spacing (may be a skip).
    Resample,
    /// Binarization plus isosurface extraction.
    Extract,
    /// Surface relaxation (may be a skip).
    Smooth,
}

impl PipelineStage {
    /// Total number of stages.
    pub const COUNT: usize = 5;

    /// 1-based position of this stage.
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Load => 1,
            Self::Validate => 2,
            Self::Resample => 3,
            Self::Extract => 4,
            Self::Smooth => 5,
        }
    }

    /// Human-readable stage description.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Load => "loading mask",
            Self::Validate => "validating mask",
            Self::Resample => "resampling to target resolution",
            Self::Extract => "extracting surface",
            Self::Smooth => "smoothing surface",
        }
    }
}

/// Observer notified at stage boundaries.
pub trait Progress {
    /// A stage is about to run (or be skipped).
    fn on_stage(&mut self, stage: PipelineStage);

    /// The pipeline finished computing (before outputs are written).
    fn on_finished(&mut self) {}
}

/// The silent default observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn on_stage(&mut self, _stage: PipelineStage) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_ordered_and_complete() {
        let stages = [
            PipelineStage::Load,
            PipelineStage::Validate,
            PipelineStage::Resample,
            PipelineStage::Extract,
            PipelineStage::Smooth,
        ];
        assert_eq!(stages.len(), PipelineStage::COUNT);
        for (i, stage) in stages.iter().enumerate() {
            assert_eq!(stage.position(), i + 1);
            assert!(!stage.label().is_empty());
        }
    }

    #[test]
    fn no_progress_is_silent() {
        let mut observer = NoProgress;
        observer.on_stage(PipelineStage::Load);
        observer.on_finished();
    }
}
