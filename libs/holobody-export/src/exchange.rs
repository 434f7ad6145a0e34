//! # Exchange Record
//!
//! The flat JSON document the visualization client loads.
//!
//! ```json
//! {
//!   "version": "v19_perfect_human",
//!   "vertexCount": 3,
//!   "faceCount": 1,
//!   "vertices": [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
//!   "indices": [0, 1, 2],
//!   "normals": [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]
//! }
//! ```
//!
//! Positions are rounded to [`VERTEX_DECIMALS`] places and normals to
//! [`NORMAL_DECIMALS`] places. Triangles wind counter-clockwise seen from
//! outside.

use std::fs;
use std::path::Path;

use config::constants::{round_to_decimals, NORMAL_DECIMALS, VERTEX_DECIMALS};
use holobody_mesh::Mesh;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ExportError, ExportResult};

/// Serialized mesh with counts, flat buffers and a version tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRecord {
    /// Generator version tag.
    pub version: String,
    /// Number of vertices (`vertices.len() / 3`).
    pub vertex_count: usize,
    /// Number of triangles (`indices.len() / 3`).
    pub face_count: usize,
    /// Flat `x, y, z` positions.
    pub vertices: Vec<f64>,
    /// Flat triangle indices.
    pub indices: Vec<u32>,
    /// Flat `x, y, z` unit normals, aligned with `vertices`.
    pub normals: Vec<f64>,
}

impl ExchangeRecord {
    /// Flattens a finished mesh.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::MissingNormals`] if the mesh has no normals.
    ///
    /// # Example
    ///
    /// ```rust
    /// use holobody_export::ExchangeRecord;
    /// use holobody_mesh::{ops::estimate_normals, Mesh};
    /// use glam::DVec3;
    ///
    /// let mut mesh = Mesh::new();
    /// mesh.add_vertex(DVec3::ZERO);
    /// mesh.add_vertex(DVec3::new(0.123456, 0.0, 0.0));
    /// mesh.add_vertex(DVec3::Y);
    /// mesh.add_triangle(0, 1, 2);
    /// assert!(ExchangeRecord::from_mesh(&mesh, "test").is_err());
    ///
    /// estimate_normals(&mut mesh);
    /// let record = ExchangeRecord::from_mesh(&mesh, "test").unwrap();
    /// assert_eq!(record.vertices[3], 0.12346);
    /// assert_eq!(record.face_count, 1);
    /// ```
    pub fn from_mesh(mesh: &Mesh, version: impl Into<String>) -> ExportResult<Self> {
        let normals = mesh.normals().ok_or(ExportError::MissingNormals)?;
        if normals.len() != mesh.vertex_count() {
            return Err(ExportError::invalid_record(format!(
                "{} normals for {} vertices",
                normals.len(),
                mesh.vertex_count()
            )));
        }

        let vertices = mesh
            .vertices()
            .iter()
            .flat_map(|v| v.to_array())
            .map(|x| round_to_decimals(x, VERTEX_DECIMALS))
            .collect();
        let normals = normals
            .iter()
            .flat_map(|n| n.to_array())
            .map(|x| round_to_decimals(x, NORMAL_DECIMALS))
            .collect();

        Ok(Self {
            version: version.into(),
            vertex_count: mesh.vertex_count(),
            face_count: mesh.triangle_count(),
            vertices,
            indices: mesh.indices_u32(),
            normals,
        })
    }

    /// Checks counts, buffer lengths, index ranges and value finiteness.
    pub fn validate(&self) -> ExportResult<()> {
        if self.vertices.len() != self.vertex_count * 3 {
            return Err(ExportError::invalid_record(format!(
                "{} coordinates for {} vertices",
                self.vertices.len(),
                self.vertex_count
            )));
        }
        if self.indices.len() != self.face_count * 3 {
            return Err(ExportError::invalid_record(format!(
                "{} indices for {} faces",
                self.indices.len(),
                self.face_count
            )));
        }
        if self.normals.len() != self.vertices.len() {
            return Err(ExportError::invalid_record(format!(
                "{} normal components for {} vertex components",
                self.normals.len(),
                self.vertices.len()
            )));
        }
        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.vertex_count)
        {
            return Err(ExportError::invalid_record(format!(
                "index {index} out of range for {} vertices",
                self.vertex_count
            )));
        }
        if !self.vertices.iter().chain(&self.normals).all(|x| x.is_finite()) {
            return Err(ExportError::invalid_record("non-finite coordinate"));
        }
        Ok(())
    }

    /// Encodes the record as compact JSON.
    pub fn to_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes and validates a record.
    pub fn from_json(json: &str) -> ExportResult<Self> {
        let record: Self = serde_json::from_str(json)?;
        record.validate()?;
        Ok(record)
    }

    /// Writes the record to `path`, creating parent directories as needed.
    pub fn write_json(&self, path: impl AsRef<Path>) -> ExportResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = self.to_json()?;
        fs::write(path, &json)?;
        info!(
            path = %path.display(),
            vertices = self.vertex_count,
            faces = self.face_count,
            bytes = json.len(),
            "Wrote exchange record"
        );
        Ok(())
    }

    /// Reads and validates a record from `path`.
    pub fn read_json(path: impl AsRef<Path>) -> ExportResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
