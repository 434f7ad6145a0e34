//! # Mesh Operations
//!
//! Post-processing applied to an extracted surface: quadric decimation,
//! Taubin smoothing and normal estimation.

pub mod normals;
pub mod simplify;
pub mod smooth;

pub use normals::{estimate_normals, NormalReport};
pub use simplify::{decimate, DecimateParams, DecimationResult};
pub use smooth::{smooth, SmoothParams, SmoothResult};
