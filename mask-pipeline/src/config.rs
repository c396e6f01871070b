//! Typed pipeline configuration with load-time validation.
//!
//! The configuration is a fully-enumerated schema, not a free-form
//! key-value tree: every field has a type and a default, unknown smoothing
//! methods are rejected during deserialization, and structural constraints
//! (at least one output path) fail at load time, before any pipeline stage
//! runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use mask_smooth::{SmoothMethod, SmoothParams};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file does not exist.
    #[error("config file not found: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Neither output path is set.
    #[error("output must specify at least one of mesh_unsmoothed_path or mesh_smoothed_path")]
    MissingOutput,

    /// A field value is outside its allowed range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// The offending field, dotted path.
        field: &'static str,
        /// Why the value is rejected.
        reason: String,
    },
}

/// Smoothing stage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothConfig {
    /// Master switch for the smoothing stage.
    pub enabled: bool,

    /// Relaxation algorithm.
    pub method: SmoothMethod,

    /// Iteration count.
    pub num_iter: u32,

    /// Laplacian damping factor, `[0, 1]`.
    pub weight: f64,

    /// Taubin shrink factor.
    pub lambda: f64,

    /// Taubin inflate factor (conventionally negative).
    pub mu: f64,

    /// Compute device selector.
    pub device: String,
}

impl Default for SmoothConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            method: SmoothMethod::Laplacian,
            num_iter: 10,
            weight: 0.1,
            lambda: 0.5,
            mu: -0.53,
            device: "cpu".to_string(),
        }
    }
}

impl SmoothConfig {
    /// Convert to engine parameters.
    #[must_use]
    pub fn to_params(&self) -> SmoothParams {
        SmoothParams {
            method: self.method,
            iterations: self.num_iter,
            weight: self.weight,
            lambda: self.lambda,
            mu: self.mu,
            device: self.device.clone(),
        }
    }

    /// Whether the pipeline should invoke the engine at all.
    ///
    /// All three gates are evaluated here, at the configuration level,
    /// independent of the engine's own no-op short-circuit.
    #[must_use]
    pub fn should_smooth(&self) -> bool {
        self.enabled && self.num_iter > 0 && self.weight > 0.0
    }
}

/// Output destinations. At least one must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination for the raw extracted mesh.
    pub mesh_unsmoothed_path: Option<PathBuf>,

    /// Destination for the smoothed mesh (or the raw mesh, when smoothing
    /// is skipped).
    pub mesh_smoothed_path: Option<PathBuf>,
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Target voxel spacing in millimeters; `null` disables resampling.
    pub target_resolution_mm: Option<[f64; 3]>,

    /// Reorient the volume to canonical RAS+ at load.
    pub reorient_canonical: bool,

    /// Smoothing stage configuration.
    pub smooth: SmoothConfig,

    /// Output destinations.
    pub output: OutputConfig,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            target_resolution_mm: Some([1.0, 1.0, 1.0]),
            reorient_canonical: true,
            smooth: SmoothConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl MeshConfig {
    /// Check the structural constraints that deserialization cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOutput`] when neither output path is
    /// set, or [`ConfigError::InvalidValue`] for an out-of-range weight.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.mesh_unsmoothed_path.is_none() && self.output.mesh_smoothed_path.is_none() {
            return Err(ConfigError::MissingOutput);
        }
        if !(0.0..=1.0).contains(&self.smooth.weight) {
            return Err(ConfigError::InvalidValue {
                field: "smooth.weight",
                reason: format!("must be in [0, 1], got {}", self.smooth.weight),
            });
        }
        Ok(())
    }

    /// A loadable starting configuration with example output paths filled
    /// in (the bare defaults fail validation by design, since they name no
    /// outputs).
    #[must_use]
    pub fn template() -> Self {
        Self {
            output: OutputConfig {
                mesh_unsmoothed_path: Some(PathBuf::from("mesh_raw.obj")),
                mesh_smoothed_path: Some(PathBuf::from("mesh_smooth.obj")),
            },
            ..Self::default()
        }
    }

    /// Pretty-printed JSON rendition.
    ///
    /// # Errors
    ///
    /// Returns a serialization error (practically unreachable for this
    /// schema).
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Load and validate a configuration file.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] for a missing file, a parse error for
/// malformed JSON or unknown enum values, and the validation errors from
/// [`MeshConfig::validate`].
///
/// # Example
///
/// ```no_run
/// use mask_pipeline::load_config;
///
/// let config = load_config("config.json").unwrap();
/// assert!(config.smooth.enabled);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MeshConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path)?;
    let config: MeshConfig = serde_json::from_str(&text)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(json: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, json).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_match_documented_table() {
        let config = MeshConfig::default();
        assert_eq!(config.target_resolution_mm, Some([1.0, 1.0, 1.0]));
        assert!(config.reorient_canonical);
        assert!(config.smooth.enabled);
        assert_eq!(config.smooth.method, SmoothMethod::Laplacian);
        assert_eq!(config.smooth.num_iter, 10);
        assert!((config.smooth.weight - 0.1).abs() < f64::EPSILON);
        assert!((config.smooth.lambda - 0.5).abs() < f64::EPSILON);
        assert!((config.smooth.mu - (-0.53)).abs() < f64::EPSILON);
        assert_eq!(config.smooth.device, "cpu");
        assert!(config.output.mesh_unsmoothed_path.is_none());
        assert!(config.output.mesh_smoothed_path.is_none());
    }

    #[test]
    fn minimal_config_loads_with_defaults() {
        let (_dir, path) = write_config(
            r#"{ "output": { "mesh_unsmoothed_path": "raw.obj" } }"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.smooth.num_iter, 10);
        assert_eq!(
            config.output.mesh_unsmoothed_path,
            Some(PathBuf::from("raw.obj"))
        );
    }

    #[test]
    fn missing_output_fails_regardless_of_other_fields() {
        let (_dir, path) = write_config(
            r#"{
                "target_resolution_mm": [1, 1, 1],
                "reorient_canonical": true,
                "smooth": { "enabled": true, "num_iter": 10, "weight": 0.1, "device": "cpu" },
                "output": {}
            }"#,
        );
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::MissingOutput)
        ));
    }

    #[test]
    fn bogus_method_fails_to_load() {
        let (_dir, path) = write_config(
            r#"{
                "smooth": { "method": "bogus" },
                "output": { "mesh_smoothed_path": "smooth.obj" }
            }"#,
        );
        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn method_aliases_load_as_none() {
        let (_dir, path) = write_config(
            r#"{
                "smooth": { "method": "disabled" },
                "output": { "mesh_smoothed_path": "smooth.obj" }
            }"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.smooth.method, SmoothMethod::None);
    }

    #[test]
    fn negative_num_iter_fails_to_parse() {
        let (_dir, path) = write_config(
            r#"{
                "smooth": { "num_iter": -3 },
                "output": { "mesh_smoothed_path": "smooth.obj" }
            }"#,
        );
        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn out_of_range_weight_fails_validation() {
        let (_dir, path) = write_config(
            r#"{
                "smooth": { "weight": 1.5 },
                "output": { "mesh_smoothed_path": "smooth.obj" }
            }"#,
        );
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::InvalidValue {
                field: "smooth.weight",
                ..
            })
        ));
    }

    #[test]
    fn null_target_resolution_disables_resampling() {
        let (_dir, path) = write_config(
            r#"{
                "target_resolution_mm": null,
                "output": { "mesh_smoothed_path": "smooth.obj" }
            }"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.target_resolution_mm, None);
    }

    #[test]
    fn missing_file_is_its_own_error() {
        let result = load_config("no/such/config.json");
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn smoothing_gates() {
        let mut smooth = SmoothConfig::default();
        assert!(smooth.should_smooth());

        smooth.enabled = false;
        assert!(!smooth.should_smooth());

        smooth.enabled = true;
        smooth.num_iter = 0;
        assert!(!smooth.should_smooth());

        smooth.num_iter = 10;
        smooth.weight = 0.0;
        assert!(!smooth.should_smooth());
    }

    #[test]
    fn template_is_loadable() {
        let template = MeshConfig::template();
        assert!(template.validate().is_ok());

        let json = template.to_json_pretty().unwrap();
        let (_dir, path) = write_config(&json);
        assert!(load_config(&path).is_ok());
    }

    #[test]
    fn bare_default_fails_validation() {
        assert!(matches!(
            MeshConfig::default().validate(),
            Err(ConfigError::MissingOutput)
        ));
    }
}
