//! # Mesh Errors
//!
//! Error types for sampling and mesh post-processing.

use holobody_sdf::SdfError;
use thiserror::Error;

/// Errors that can occur while building a mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Error from the distance-field layer
    #[error("Field error: {0}")]
    Sdf(#[from] SdfError),

    /// Grid bounds or resolution are unusable
    #[error("Invalid grid: {message}")]
    InvalidGrid {
        /// What was wrong.
        message: String,
    },

    /// Smoothing parameters are out of range
    #[error("Invalid smoothing parameters: {message}")]
    InvalidSmoothing {
        /// What was wrong.
        message: String,
    },

    /// Decimation parameters are out of range
    #[error("Invalid decimation parameters: {message}")]
    InvalidDecimation {
        /// What was wrong.
        message: String,
    },
}

impl MeshError {
    /// Creates an invalid grid error.
    pub fn invalid_grid(message: impl Into<String>) -> Self {
        Self::InvalidGrid {
            message: message.into(),
        }
    }

    /// Creates an invalid smoothing error.
    pub fn invalid_smoothing(message: impl Into<String>) -> Self {
        Self::InvalidSmoothing {
            message: message.into(),
        }
    }

    /// Creates an invalid decimation error.
    pub fn invalid_decimation(message: impl Into<String>) -> Self {
        Self::InvalidDecimation {
            message: message.into(),
        }
    }
}
