//! # Generation Config
//!
//! Runtime settings for one body generation run, loadable from JSON.
//! Missing keys fall back to the reference settings.

use std::fs;
use std::path::{Path, PathBuf};

use config::constants::{
    DEFAULT_RELAXATION_FACTOR, DEFAULT_SMOOTHING_ITERATIONS, DEFAULT_TARGET_TRIANGLES,
    EXCHANGE_VERSION,
};
use holobody_mesh::{run_preset, DecimateParams, GridSpec, PipelineParams, SmoothParams};
use holobody_sdf::BodyPreset;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ExportResult;
use crate::exchange::ExchangeRecord;

/// File the client loads the body mesh from.
pub const DEFAULT_OUTPUT_PATH: &str = "assets/data/holo_body_v19.json";

/// Settings for [`render_body`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Version tag written into the exchange record.
    pub version: String,
    /// Body composition.
    pub preset: BodyPreset,
    /// Sampling lattice.
    pub grid: GridSpec,
    /// Decimation budget.
    pub target_triangles: usize,
    /// Taubin iteration pairs.
    pub smoothing_iterations: u32,
    /// Taubin relaxation (lambda).
    pub relaxation: f64,
    /// Destination used by [`GenerationConfig::render_to_output`].
    pub output: PathBuf,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            version: EXCHANGE_VERSION.to_string(),
            preset: BodyPreset::athletic(),
            grid: GridSpec::body_default(),
            target_triangles: DEFAULT_TARGET_TRIANGLES,
            smoothing_iterations: DEFAULT_SMOOTHING_ITERATIONS,
            relaxation: DEFAULT_RELAXATION_FACTOR,
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl GenerationConfig {
    /// Parses a config from JSON. Absent keys take their defaults.
    pub fn from_json(json: &str) -> ExportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a config file.
    pub fn from_path(path: impl AsRef<Path>) -> ExportResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Pipeline settings derived from this config.
    pub fn pipeline_params(&self) -> PipelineParams {
        PipelineParams {
            grid: self.grid,
            decimate: Some(DecimateParams::with_target_triangles(self.target_triangles)),
            smooth: SmoothParams::new(self.smoothing_iterations, self.relaxation),
        }
    }

    /// Renders the body and writes the record to [`Self::output`].
    pub fn render_to_output(&self) -> ExportResult<ExchangeRecord> {
        let record = render_body(self)?;
        record.write_json(&self.output)?;
        Ok(record)
    }
}

/// Composes the configured preset, runs the mesh pipeline and flattens the
/// result into an exchange record.
///
/// # Errors
///
/// Returns an error if the preset or pipeline settings are invalid.
pub fn render_body(config: &GenerationConfig) -> ExportResult<ExchangeRecord> {
    info!(
        preset = %config.preset.name,
        version = %config.version,
        "Rendering body"
    );
    let output = run_preset(&config.preset, &config.pipeline_params())?;
    if !output.stats.within_decimation_bound {
        warn!(
            triangles = output.stats.final_triangles,
            target = config.target_triangles,
            "Body mesh exceeds the tolerated triangle budget"
        );
    }
    ExchangeRecord::from_mesh(&output.mesh, config.version.clone())
}
