//! # HoloBody SDF
//!
//! Signed distance primitives, smooth blending and body composition.
//!
//! ## Architecture
//!
//! ```text
//! BodyPreset (data) → compose → ComposedField → holobody-mesh (sampling)
//! ```
//!
//! ## Modules
//!
//! - [`primitives`]: sphere, ellipsoid, capsule and tapered capsule
//! - [`blend`]: polynomial smooth minimum
//! - [`field`]: the composed field and the [`DistanceField`] trait
//! - [`anatomy`]: body presets and the built-in athletic figure
//!
//! Conventions: negative distances are inside; y grows toward the feet.
//!
//! ## Usage
//!
//! ```rust
//! use holobody_sdf::{compose, BodyPreset, DistanceField};
//! use glam::DVec3;
//!
//! let field = compose(&BodyPreset::athletic());
//! assert!(field.distance(DVec3::new(0.0, -0.92, 0.02)) < 0.0);
//! ```

pub mod anatomy;
pub mod blend;
pub mod error;
pub mod field;
pub mod primitives;

pub use anatomy::{compose, BodyPreset, PartDescriptor, PartGroup};
pub use blend::smooth_min;
pub use error::{SdfError, SdfResult};
pub use field::{ComposedField, DistanceField, FieldPart};
pub use primitives::{Axis, Primitive};
