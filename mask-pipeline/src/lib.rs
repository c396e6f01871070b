//! Stage orchestration for the maskmesh pipeline.
//!
//! Sequences the full mask-to-mesh conversion:
//!
//! ```text
//! Load -> Validate -> (Resample?) -> Binarize -> Extract -> (Smooth?) -> Write
//! ```
//!
//! Each stage is synchronous and consumes the full output of the previous
//! one; a failure at any stage aborts the remainder of the run. Stage
//! boundaries are reported through a [`Progress`] observer, decoupled from
//! the stage logic itself.
//!
//! # Output Fallback
//!
//! A configured "smoothed" output is treated as *best available*: when
//! smoothing is disabled or gated off, the unsmoothed mesh is written to
//! that path instead of failing or omitting the file.
//!
//! # Example
//!
//! ```no_run
//! use mask_pipeline::{load_config, run, NoProgress};
//!
//! let config = load_config("config.json").unwrap();
//! let summary = run("mask.nii.gz", &config, &mut NoProgress).unwrap();
//! println!("{summary}");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod pipeline;
mod progress;

pub use config::{load_config, ConfigError, MeshConfig, OutputConfig, SmoothConfig};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{generate_mesh, run, MeshArtifacts, RunSummary};
pub use progress::{NoProgress, PipelineStage, Progress};
