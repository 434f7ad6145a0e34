//! # Smooth Blending
//!
//! Polynomial smooth minimum used to fuse body parts into one surface.
//! The blend radius `k` is the approximate width of the fillet formed where
//! two surfaces meet; as `k` shrinks the operator approaches a hard minimum.

use config::constants::MIN_BLEND_RADIUS;

/// Linear interpolation `a (1 - t) + b t`.
#[inline]
pub fn mix(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Hard union of two distances.
#[inline]
pub fn hard_min(a: f64, b: f64) -> f64 {
    a.min(b)
}

/// Smooth union of two signed distances.
///
/// Returns a value no greater than `min(a, b)`. Far from the junction
/// (`|a - b| >= k`) it is exactly the minimum; at equal inputs it dips by
/// `k / 4`.
///
/// `k` is clamped to [`MIN_BLEND_RADIUS`], so a zero blend radius yields a
/// sharp seam instead of a division by zero.
///
/// # Example
///
/// ```rust
/// use holobody_sdf::blend::smooth_min;
///
/// assert_eq!(smooth_min(0.0, 1.0, 0.1), 0.0);
/// assert!(smooth_min(0.5, 0.5, 0.2) < 0.5);
/// ```
#[inline]
pub fn smooth_min(a: f64, b: f64, k: f64) -> f64 {
    let k = k.max(MIN_BLEND_RADIUS);
    let h = (0.5 + 0.5 * (b - a) / k).clamp(0.0, 1.0);
    mix(b, a, h) - k * h * (1.0 - h)
}
