//! # SDF Errors
//!
//! Error types for primitive validation and preset loading.
//!
//! ## Error Policy
//!
//! Distance evaluation itself never fails: degenerate numeric input is
//! guarded locally and NaN/Inf propagate. Errors are only raised at the
//! preset boundary, where configuration enters the pipeline.

use thiserror::Error;

/// Errors that can occur while validating or loading a body composition.
#[derive(Debug, Error)]
pub enum SdfError {
    /// A primitive radius is zero, negative or not finite.
    #[error("Invalid radius {radius} for part '{part}'")]
    InvalidRadius {
        /// Name of the offending body part.
        part: String,
        /// The rejected radius.
        radius: f64,
    },

    /// A primitive anchor is not finite.
    #[error("Invalid anchor for part '{part}': {message}")]
    InvalidAnchor {
        /// Name of the offending body part.
        part: String,
        /// What was wrong with the anchor.
        message: String,
    },

    /// A blend radius is negative or not finite.
    #[error("Invalid blend radius {blend} for part '{part}'")]
    InvalidBlend {
        /// Name of the offending body part.
        part: String,
        /// The rejected blend radius.
        blend: f64,
    },

    /// The preset contains no parts at all.
    #[error("Body preset '{0}' contains no parts")]
    EmptyPreset(String),

    /// The preset document could not be parsed.
    #[error("Preset parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SdfError {
    /// Creates an invalid radius error.
    pub fn invalid_radius(part: impl Into<String>, radius: f64) -> Self {
        Self::InvalidRadius {
            part: part.into(),
            radius,
        }
    }

    /// Creates an invalid anchor error.
    pub fn invalid_anchor(part: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAnchor {
            part: part.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for SDF operations.
pub type SdfResult<T> = Result<T, SdfError>;
