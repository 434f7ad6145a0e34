//! # Export Errors
//!
//! Error types for exchange-record export and generation config loading.

use holobody_mesh::MeshError;
use thiserror::Error;

/// Errors that can occur while exporting a mesh.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Error from the mesh pipeline
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    /// The mesh has no normals to export
    #[error("Mesh has no normals; run normal estimation before export")]
    MissingNormals,

    /// A record violates its own counts or index ranges
    #[error("Invalid exchange record: {message}")]
    InvalidRecord { message: String },

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Creates an invalid record error.
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
