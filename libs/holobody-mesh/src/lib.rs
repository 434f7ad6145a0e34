//! # HoloBody Mesh
//!
//! Turns a distance field into a finished triangle mesh.
//!
//! ## Architecture
//!
//! ```text
//! ComposedField → sample → SampleGrid → marching_cubes → Mesh
//!               → decimate → smooth → estimate_normals → Mesh (with normals)
//! ```
//!
//! Every stage consumes the complete output of the previous one. Sampling
//! and extraction run on `rayon`; the mesh operations are sequential.
//!
//! ## Usage
//!
//! ```rust
//! use holobody_mesh::{run_pipeline, GridSpec, PipelineParams};
//! use holobody_sdf::{ComposedField, Primitive};
//! use glam::DVec3;
//!
//! let field = ComposedField::new().with_part(
//!     "ball",
//!     Primitive::Sphere { center: DVec3::ZERO, radius: 1.0 },
//!     0.05,
//! );
//! let params = PipelineParams {
//!     grid: GridSpec::cube(-1.2, 1.2, 24).unwrap(),
//!     ..Default::default()
//! };
//! let output = run_pipeline(&field, &params).unwrap();
//! assert!(output.mesh.normals().is_some());
//! ```

pub mod error;
pub mod grid;
pub mod marching_cubes;
pub mod mesh;
pub mod ops;
pub mod pipeline;

pub use error::MeshError;
pub use grid::{sample, GridSpec, SampleGrid};
pub use marching_cubes::{extract_isosurface, marching_cubes};
pub use mesh::Mesh;
pub use ops::{DecimateParams, DecimationResult, SmoothParams};
pub use pipeline::{run_pipeline, run_preset, PipelineOutput, PipelineParams, PipelineStats};
