//! # Configuration Constants
//!
//! Centralized constants for the HoloBody pipeline. All field evaluation,
//! sampling, extraction, decimation and export parameters are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point tolerances and numeric guards
//! - **Field**: Smooth-blend and empty-field parameters
//! - **Grid**: Default sampling lattice for the built-in body preset
//! - **Post-processing**: Decimation and smoothing defaults
//! - **Export**: Exchange-record precision and version tag

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Denominator guard for capsule axis projection.
///
/// Added to the squared axis length so a capsule whose anchors coincide
/// collapses to a sphere instead of dividing by zero.
///
/// # Example
///
/// ```rust
/// use config::constants::CAPSULE_AXIS_EPSILON;
///
/// let axis_length_sq = 0.0;
/// let denominator = axis_length_sq + CAPSULE_AXIS_EPSILON;
/// assert!(denominator > 0.0);
/// ```
pub const CAPSULE_AXIS_EPSILON: f64 = 1e-6;

/// Squared cross-product length below which a triangle counts as zero-area.
///
/// Degenerate faces are skipped by normal estimation and rejected by the
/// simplifier.
///
/// # Example
///
/// ```rust
/// use config::constants::DEGENERATE_AREA_EPSILON;
///
/// let doubled_area_sq: f64 = 0.0;
/// assert!(doubled_area_sq <= DEGENERATE_AREA_EPSILON);
/// ```
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-24;

// =============================================================================
// FIELD CONSTANTS
// =============================================================================

/// Smallest blend radius accepted by the smooth-min operator.
///
/// Blend radii below this value are clamped up, which turns the operator
/// into an (almost) hard minimum without dividing by zero.
///
/// # Example
///
/// ```rust
/// use config::constants::MIN_BLEND_RADIUS;
///
/// let k: f64 = 0.0;
/// assert!(k.max(MIN_BLEND_RADIUS) > 0.0);
/// ```
pub const MIN_BLEND_RADIUS: f64 = 1e-9;

/// Blend radius used when a part does not specify its own.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_BLEND_RADIUS;
/// assert!(DEFAULT_BLEND_RADIUS > 0.0);
/// ```
pub const DEFAULT_BLEND_RADIUS: f64 = 0.08;

/// Distance reported by a field that contains no primitives.
///
/// Also the seed of the smooth-min fold. It is far enough outside every
/// body part that blending the first primitive into it returns that
/// primitive's distance unchanged.
///
/// # Example
///
/// ```rust
/// use config::constants::EMPTY_FIELD_DISTANCE;
/// assert!(EMPTY_FIELD_DISTANCE > 0.0);
/// ```
pub const EMPTY_FIELD_DISTANCE: f64 = 1.0e6;

/// Level set extracted by marching cubes.
pub const ISO_LEVEL: f64 = 0.0;

// =============================================================================
// GRID CONSTANTS
// =============================================================================

/// Minimum number of lattice nodes along any grid axis.
///
/// # Example
///
/// ```rust
/// use config::constants::MIN_GRID_RESOLUTION;
///
/// let requested = 1;
/// assert!(requested < MIN_GRID_RESOLUTION);
/// ```
pub const MIN_GRID_RESOLUTION: usize = 2;

/// Default resolution along the reference (x) axis of the body grid.
pub const DEFAULT_GRID_RESOLUTION: usize = 135;

/// Lower corner of the default body grid (x, y, z).
///
/// Y grows toward the feet, so the head sits near `y = -1.0`. The lower
/// y bound leaves a margin above the crown so the head surface closes.
pub const BODY_GRID_MIN: [f64; 3] = [-0.6, -1.05, -0.35];

/// Upper corner of the default body grid (x, y, z).
pub const BODY_GRID_MAX: [f64; 3] = [0.6, 1.1, 0.35];

/// Per-axis node counts of the default body grid.
///
/// The y and z counts are the x count scaled by 2.1 and 0.7 and truncated.
///
/// # Example
///
/// ```rust
/// use config::constants::{BODY_GRID_RESOLUTION, DEFAULT_GRID_RESOLUTION};
///
/// assert_eq!(BODY_GRID_RESOLUTION[0], DEFAULT_GRID_RESOLUTION);
/// assert_eq!(BODY_GRID_RESOLUTION[1], (DEFAULT_GRID_RESOLUTION as f64 * 2.1) as usize);
/// ```
pub const BODY_GRID_RESOLUTION: [usize; 3] = [DEFAULT_GRID_RESOLUTION, 283, 94];

/// Maximum number of lattice nodes in a single grid.
///
/// Safety limit to prevent memory exhaustion from runaway resolutions.
///
/// # Example
///
/// ```rust
/// use config::constants::{BODY_GRID_RESOLUTION, MAX_GRID_NODES};
///
/// let nodes: usize = BODY_GRID_RESOLUTION.iter().product();
/// assert!(nodes < MAX_GRID_NODES);
/// ```
pub const MAX_GRID_NODES: usize = 64_000_000;

// =============================================================================
// POST-PROCESSING CONSTANTS
// =============================================================================

/// Triangle budget the extracted body is decimated to.
pub const DEFAULT_TARGET_TRIANGLES: usize = 12_000;

/// Multiple of the target triangle count the simplifier is expected to stay
/// under. Results above it are reported, never rejected.
pub const DECIMATION_TOLERANCE_MULTIPLE: f64 = 1.4;

/// Default number of smoothing iterations.
pub const DEFAULT_SMOOTHING_ITERATIONS: u32 = 20;

/// Largest accepted number of smoothing iterations.
///
/// Together with [`MAX_STABLE_RELAXATION`] this caps the total pass-band
/// amplification of a smoothing run at [`max_taubin_gain`] raised to this
/// power, about 1.013.
pub const MAX_SMOOTHING_ITERATIONS: u32 = 500;

/// Default smoothing relaxation factor.
pub const DEFAULT_RELAXATION_FACTOR: f64 = 0.08;

/// Largest relaxation factor applied per smoothing pass.
///
/// Larger factors are accepted and capped here. The Taubin pass-band bump
/// grows with lambda, so this keeps a run of [`MAX_SMOOTHING_ITERATIONS`]
/// pairs from inflating the surface.
pub const MAX_STABLE_RELAXATION: f64 = 0.1;

/// Taubin pass-band frequency `k_pb` used to derive the inflation factor.
///
/// # Example
///
/// ```rust
/// use config::constants::TAUBIN_PASS_BAND;
///
/// let lambda = 0.1;
/// let mu = 1.0 / (TAUBIN_PASS_BAND - 1.0 / lambda);
/// assert!(mu < -lambda);
/// ```
pub const TAUBIN_PASS_BAND: f64 = 0.1;

/// Peak gain of one Taubin `lambda`/`mu` pair over the umbrella spectrum.
///
/// The transfer function `(1 - lambda k)(1 - mu k)` peaks at
/// `1 + (k_pb lambda)^2 / (4 (1 - k_pb lambda))` inside the pass band and
/// stays at or below 1 everywhere else for `lambda <= 0.5`.
///
/// # Example
///
/// ```rust
/// use config::constants::{max_taubin_gain, MAX_SMOOTHING_ITERATIONS, MAX_STABLE_RELAXATION};
///
/// let total = max_taubin_gain(MAX_STABLE_RELAXATION).powi(MAX_SMOOTHING_ITERATIONS as i32);
/// assert!(total < 1.02);
/// ```
pub fn max_taubin_gain(lambda: f64) -> f64 {
    let t = TAUBIN_PASS_BAND * lambda;
    1.0 + t * t / (4.0 * (1.0 - t))
}

// =============================================================================
// EXPORT CONSTANTS
// =============================================================================

/// Decimal digits kept for vertex positions in the exchange record.
pub const VERTEX_DECIMALS: u32 = 5;

/// Decimal digits kept for vertex normals in the exchange record.
pub const NORMAL_DECIMALS: u32 = 4;

/// Version tag written into exchange records by default.
pub const EXCHANGE_VERSION: &str = "v19_perfect_human";

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Rounds a value to a fixed number of decimal digits.
///
/// Used by the exchange format, which stores positions and normals with
/// a documented, lossy precision.
///
/// # Example
///
/// ```rust
/// use config::constants::round_to_decimals;
///
/// assert_eq!(round_to_decimals(0.123456789, 5), 0.12346);
/// assert_eq!(round_to_decimals(-0.00004, 4), -0.0);
/// ```
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Computes a node count for one axis so that its cells match the cell size
/// of a reference axis.
///
/// # Arguments
///
/// * `extent` - Length of the axis being sized
/// * `reference_extent` - Length of the reference axis
/// * `reference_resolution` - Node count along the reference axis
///
/// # Example
///
/// ```rust
/// use config::constants::{proportional_resolution, MIN_GRID_RESOLUTION};
///
/// assert_eq!(proportional_resolution(1.0, 2.0, 101), 51);
/// assert_eq!(proportional_resolution(0.0, 2.0, 101), MIN_GRID_RESOLUTION);
/// ```
pub fn proportional_resolution(
    extent: f64,
    reference_extent: f64,
    reference_resolution: usize,
) -> usize {
    if reference_extent <= 0.0 || reference_resolution < MIN_GRID_RESOLUTION {
        return MIN_GRID_RESOLUTION;
    }
    let cells = (reference_resolution - 1) as f64 * extent / reference_extent;
    (cells.round() as usize + 1).max(MIN_GRID_RESOLUTION)
}
