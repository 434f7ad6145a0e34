//! # Config Crate
//!
//! Centralized configuration constants for the HoloBody mesh pipeline.
//! All magic numbers and tunable parameters are defined here to ensure
//! consistency across crates and easy configuration management.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{BODY_GRID_RESOLUTION, DEFAULT_TARGET_TRIANGLES, EPSILON};
//!
//! // Use EPSILON for floating-point comparisons
//! let value: f64 = 0.00000000001; // 1e-11, smaller than EPSILON (1e-10)
//! assert!(value.abs() < EPSILON);
//!
//! // Default sampling lattice and triangle budget
//! let nodes: usize = BODY_GRID_RESOLUTION.iter().product();
//! assert!(nodes > DEFAULT_TARGET_TRIANGLES);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Reproducible**: Defaults match the reference body generator
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
