//! Parameters for mesh decimation.

use config::constants::DEFAULT_TARGET_TRIANGLES;
use serde::{Deserialize, Serialize};

use crate::error::MeshError;

/// Parameters for mesh decimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecimateParams {
    /// Target number of triangles. If None, uses `target_ratio` instead.
    pub target_triangles: Option<usize>,

    /// Fraction of the original triangles to keep (0.0 to 1.0). Default: 0.5
    pub target_ratio: f64,

    /// Never move vertices on open boundaries. Default: true
    pub preserve_boundary: bool,

    /// Stop once the cheapest collapse costs more than this. If None, no limit.
    pub max_error: Option<f64>,
}

impl Default for DecimateParams {
    fn default() -> Self {
        Self {
            target_triangles: None,
            target_ratio: 0.5,
            preserve_boundary: true,
            max_error: None,
        }
    }
}

impl DecimateParams {
    /// Params targeting a specific triangle count.
    #[must_use]
    pub fn with_target_triangles(count: usize) -> Self {
        Self {
            target_triangles: Some(count),
            ..Default::default()
        }
    }

    /// Params targeting a ratio of the original triangles.
    #[must_use]
    pub fn with_target_ratio(ratio: f64) -> Self {
        Self {
            target_ratio: ratio.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// The default budget for the body mesh.
    #[must_use]
    pub fn body_default() -> Self {
        Self::with_target_triangles(DEFAULT_TARGET_TRIANGLES)
    }

    /// Set preserve boundary option.
    #[must_use]
    pub const fn with_preserve_boundary(mut self, preserve: bool) -> Self {
        self.preserve_boundary = preserve;
        self
    }

    /// Set maximum error threshold.
    #[must_use]
    pub const fn with_max_error(mut self, max_error: f64) -> Self {
        self.max_error = Some(max_error);
        self
    }

    /// Triangle budget for a mesh with `original` triangles.
    pub fn target_for(&self, original: usize) -> usize {
        self.target_triangles
            .unwrap_or_else(|| (original as f64 * self.target_ratio).ceil() as usize)
    }

    /// Checks the ratio and error threshold.
    pub fn validate(&self) -> Result<(), MeshError> {
        if !(0.0..=1.0).contains(&self.target_ratio) {
            return Err(MeshError::invalid_decimation(format!(
                "target ratio {} outside [0, 1]",
                self.target_ratio
            )));
        }
        if let Some(max_error) = self.max_error {
            if !(max_error.is_finite() && max_error >= 0.0) {
                return Err(MeshError::invalid_decimation(format!(
                    "max error {max_error} must be finite and non-negative"
                )));
            }
        }
        Ok(())
    }
}
