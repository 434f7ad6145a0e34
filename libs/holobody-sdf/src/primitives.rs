//! # Primitive Distance Library
//!
//! Signed distance functions for the four body primitives. Every function
//! returns a negative value inside, zero on the surface and a positive
//! value outside.
//!
//! | Primitive | Exact? |
//! |-----------|--------|
//! | Sphere | yes |
//! | Ellipsoid | bound, degrades for extreme aspect ratios |
//! | Capsule | yes |
//! | Tapered capsule | yes on the axis, linear radius blend |
//!
//! All functions are total: NaN and infinite inputs propagate.

use config::constants::{CAPSULE_AXIS_EPSILON, EPSILON};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{SdfError, SdfResult};

/// Coordinate axis used for mirroring side-symmetric parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// The lateral axis (left/right).
    X,
    /// The vertical axis, increasing toward the feet.
    Y,
    /// The depth axis, increasing toward the front of the body.
    Z,
}

impl Axis {
    /// Returns `point` with the coordinate on this axis negated.
    #[inline]
    pub fn reflect(self, point: DVec3) -> DVec3 {
        match self {
            Axis::X => DVec3::new(-point.x, point.y, point.z),
            Axis::Y => DVec3::new(point.x, -point.y, point.z),
            Axis::Z => DVec3::new(point.x, point.y, -point.z),
        }
    }
}

/// A body primitive with its model-space parameters.
///
/// # Example
///
/// ```rust
/// use holobody_sdf::Primitive;
/// use glam::DVec3;
///
/// let head = Primitive::Sphere { center: DVec3::ZERO, radius: 1.0 };
/// assert!((head.distance(DVec3::new(2.0, 0.0, 0.0)) - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Sphere around `center`.
    Sphere {
        /// Sphere center.
        center: DVec3,
        /// Sphere radius.
        radius: f64,
    },
    /// Axis-aligned ellipsoid with per-axis radii.
    Ellipsoid {
        /// Ellipsoid center.
        center: DVec3,
        /// Radii along x, y and z.
        radii: DVec3,
    },
    /// Segment `a`–`b` swept by a sphere of constant radius.
    Capsule {
        /// First axis anchor.
        a: DVec3,
        /// Second axis anchor.
        b: DVec3,
        /// Sweep radius.
        radius: f64,
    },
    /// Segment `a`–`b` swept by a sphere whose radius varies linearly.
    TaperedCapsule {
        /// First axis anchor.
        a: DVec3,
        /// Second axis anchor.
        b: DVec3,
        /// Radius at `a`.
        radius_a: f64,
        /// Radius at `b`.
        radius_b: f64,
    },
}

impl Primitive {
    /// Signed distance from `point` to the primitive surface.
    #[inline]
    pub fn distance(&self, point: DVec3) -> f64 {
        match *self {
            Primitive::Sphere { center, radius } => sd_sphere(point - center, radius),
            Primitive::Ellipsoid { center, radii } => sd_ellipsoid(point - center, radii),
            Primitive::Capsule { a, b, radius } => sd_capsule(point, a, b, radius),
            Primitive::TaperedCapsule {
                a,
                b,
                radius_a,
                radius_b,
            } => sd_tapered_capsule(point, a, b, radius_a, radius_b),
        }
    }

    /// Returns a copy reflected across the plane orthogonal to `axis`.
    ///
    /// Radii are unchanged; only anchor coordinates flip.
    pub fn mirrored(&self, axis: Axis) -> Self {
        match *self {
            Primitive::Sphere { center, radius } => Primitive::Sphere {
                center: axis.reflect(center),
                radius,
            },
            Primitive::Ellipsoid { center, radii } => Primitive::Ellipsoid {
                center: axis.reflect(center),
                radii,
            },
            Primitive::Capsule { a, b, radius } => Primitive::Capsule {
                a: axis.reflect(a),
                b: axis.reflect(b),
                radius,
            },
            Primitive::TaperedCapsule {
                a,
                b,
                radius_a,
                radius_b,
            } => Primitive::TaperedCapsule {
                a: axis.reflect(a),
                b: axis.reflect(b),
                radius_a,
                radius_b,
            },
        }
    }

    /// Conservative axis-aligned bounds of the solid, as `(min, max)`.
    pub fn bounds(&self) -> (DVec3, DVec3) {
        match *self {
            Primitive::Sphere { center, radius } => {
                (center - DVec3::splat(radius), center + DVec3::splat(radius))
            }
            Primitive::Ellipsoid { center, radii } => (center - radii, center + radii),
            Primitive::Capsule { a, b, radius } => {
                let r = DVec3::splat(radius);
                (a.min(b) - r, a.max(b) + r)
            }
            Primitive::TaperedCapsule {
                a,
                b,
                radius_a,
                radius_b,
            } => {
                let r = DVec3::splat(radius_a.max(radius_b));
                (a.min(b) - r, a.max(b) + r)
            }
        }
    }

    /// Checks radii and anchors of the primitive.
    ///
    /// The hot evaluation path never validates; this is meant for the
    /// boundary where presets are loaded.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::InvalidRadius`] for a non-positive or non-finite
    /// radius and [`SdfError::InvalidAnchor`] for non-finite anchors.
    pub fn validate(&self, part: &str) -> SdfResult<()> {
        let (anchors, radii): (Vec<DVec3>, Vec<f64>) = match *self {
            Primitive::Sphere { center, radius } => (vec![center], vec![radius]),
            Primitive::Ellipsoid { center, radii } => {
                (vec![center], vec![radii.x, radii.y, radii.z])
            }
            Primitive::Capsule { a, b, radius } => (vec![a, b], vec![radius]),
            Primitive::TaperedCapsule {
                a,
                b,
                radius_a,
                radius_b,
            } => (vec![a, b], vec![radius_a, radius_b]),
        };

        if let Some(bad) = radii.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
            return Err(SdfError::invalid_radius(part, *bad));
        }
        if anchors.iter().any(|p| !p.is_finite()) {
            return Err(SdfError::invalid_anchor(part, "anchor is not finite"));
        }
        Ok(())
    }
}

/// Sphere distance for a point already relative to the center.
#[inline]
pub fn sd_sphere(p: DVec3, radius: f64) -> f64 {
    p.length() - radius
}

/// Ellipsoid distance bound `k0 (k0 - 1) / k1`.
///
/// `k0` is the length of the point mapped onto the unit sphere and `k1`
/// the same with the radii squared. Exact on the surface, approximate
/// elsewhere. At the center (`k1 == 0`) the result is `-min(radii)`.
#[inline]
pub fn sd_ellipsoid(p: DVec3, radii: DVec3) -> f64 {
    let k0 = (p / radii).length();
    let k1 = (p / (radii * radii)).length();
    if k1 < EPSILON {
        return -radii.min_element();
    }
    k0 * (k0 - 1.0) / k1
}

/// Clamped projection parameter of `p` onto segment `a`–`b`.
///
/// The denominator carries [`CAPSULE_AXIS_EPSILON`], so a degenerate axis
/// (`a == b`) projects to `h = 0`.
#[inline]
pub fn segment_parameter(pa: DVec3, ba: DVec3) -> f64 {
    (pa.dot(ba) / (ba.dot(ba) + CAPSULE_AXIS_EPSILON)).clamp(0.0, 1.0)
}

/// Capsule distance: distance to the closest point of the segment minus `radius`.
#[inline]
pub fn sd_capsule(p: DVec3, a: DVec3, b: DVec3, radius: f64) -> f64 {
    let pa = p - a;
    let ba = b - a;
    let h = segment_parameter(pa, ba);
    (pa - ba * h).length() - radius
}

/// Tapered capsule distance with radius interpolated along the projection.
#[inline]
pub fn sd_tapered_capsule(p: DVec3, a: DVec3, b: DVec3, radius_a: f64, radius_b: f64) -> f64 {
    let pa = p - a;
    let ba = b - a;
    let h = segment_parameter(pa, ba);
    (pa - ba * h).length() - (radius_a * (1.0 - h) + radius_b * h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_center_and_surface() {
        let center = DVec3::new(0.3, -0.2, 0.1);
        for radius in [0.01, 0.5, 1.0, 7.5] {
            let s = Primitive::Sphere { center, radius };
            assert_relative_eq!(s.distance(center), -radius, epsilon = 1e-6);
            for dir in [DVec3::X, DVec3::NEG_Y, DVec3::new(1.0, 1.0, 1.0).normalize()] {
                assert!(s.distance(center + dir * radius).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_ellipsoid_surface_is_exact() {
        let radii = DVec3::new(0.07, 0.088, 0.078);
        let e = Primitive::Ellipsoid {
            center: DVec3::ZERO,
            radii,
        };
        assert!(e.distance(DVec3::new(0.07, 0.0, 0.0)).abs() < 1e-9);
        assert!(e.distance(DVec3::new(0.0, -0.088, 0.0)).abs() < 1e-9);
        assert!(e.distance(DVec3::new(0.0, 0.0, 0.078)).abs() < 1e-9);
        assert!(e.distance(DVec3::new(0.2, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn test_ellipsoid_center_is_finite() {
        let radii = DVec3::new(0.04, 0.02, 0.07);
        let d = sd_ellipsoid(DVec3::ZERO, radii);
        assert!(d.is_finite());
        assert_relative_eq!(d, -0.02);
    }

    #[test]
    fn test_ellipsoid_matches_sphere_when_isotropic() {
        let e = sd_ellipsoid(DVec3::new(0.0, 2.0, 0.0), DVec3::splat(1.0));
        assert_relative_eq!(e, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_capsule_distance_along_axis() {
        let a = DVec3::new(0.0, -1.0, 0.0);
        let b = DVec3::new(0.0, 1.0, 0.0);
        // Beside the middle of the segment
        assert_relative_eq!(sd_capsule(DVec3::new(0.5, 0.0, 0.0), a, b, 0.25), 0.25, epsilon = 1e-6);
        // Beyond the cap
        assert_relative_eq!(sd_capsule(DVec3::new(0.0, 2.0, 0.0), a, b, 0.25), 0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_capsule_is_sphere() {
        let a = DVec3::new(0.1, 0.2, 0.3);
        let radius = 0.4;
        for p in [
            DVec3::ZERO,
            DVec3::new(1.0, -1.0, 0.5),
            a,
            a + DVec3::new(0.0, 0.4, 0.0),
        ] {
            assert_relative_eq!(sd_capsule(p, a, a, radius), sd_sphere(p - a, radius), epsilon = 1e-12);
            assert_relative_eq!(
                sd_tapered_capsule(p, a, a, radius, 0.9),
                sd_sphere(p - a, radius),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_capsule_is_continuous() {
        let a = DVec3::new(-0.3, 0.0, 0.0);
        let b = DVec3::new(0.4, 0.1, 0.0);
        let step = 1e-5;
        let mut previous = sd_capsule(DVec3::new(-1.0, 0.2, 0.05), a, b, 0.1);
        for i in 1..=200_000 {
            let x = -1.0 + i as f64 * step;
            let d = sd_capsule(DVec3::new(x, 0.2, 0.05), a, b, 0.1);
            // Distance functions are 1-Lipschitz
            assert!((d - previous).abs() <= step * (1.0 + 1e-6));
            previous = d;
        }
    }

    #[test]
    fn test_tapered_capsule_interpolates_radius() {
        let a = DVec3::ZERO;
        let b = DVec3::new(0.0, 1.0, 0.0);
        let mid = DVec3::new(0.0, 0.5, 0.0);
        assert_relative_eq!(sd_tapered_capsule(mid, a, b, 0.2, 0.1), -0.15, epsilon = 1e-6);
        assert_relative_eq!(sd_tapered_capsule(a, a, b, 0.2, 0.1), -0.2, epsilon = 1e-6);
        assert_relative_eq!(sd_tapered_capsule(b, a, b, 0.2, 0.1), -0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_nan_propagates() {
        let s = Primitive::Sphere {
            center: DVec3::ZERO,
            radius: 1.0,
        };
        assert!(s.distance(DVec3::new(f64::NAN, 0.0, 0.0)).is_nan());
        let e = Primitive::Ellipsoid {
            center: DVec3::ZERO,
            radii: DVec3::ONE,
        };
        assert!(e.distance(DVec3::new(f64::NAN, 0.0, 0.0)).is_nan());
    }

    #[test]
    fn test_mirrored_flips_only_chosen_axis() {
        let c = Primitive::Capsule {
            a: DVec3::new(0.0, -0.7, 0.02),
            b: DVec3::new(0.2, -0.71, 0.0),
            radius: 0.022,
        };
        let m = c.mirrored(Axis::X);
        assert_eq!(
            m,
            Primitive::Capsule {
                a: DVec3::new(-0.0, -0.7, 0.02),
                b: DVec3::new(-0.2, -0.71, 0.0),
                radius: 0.022,
            }
        );
        let p = DVec3::new(0.1, -0.7, 0.0);
        assert_relative_eq!(c.distance(p), m.distance(Axis::X.reflect(p)));
    }

    #[test]
    fn test_bounds_contain_surface_samples() {
        let t = Primitive::TaperedCapsule {
            a: DVec3::new(0.12, -0.12, 0.0),
            b: DVec3::new(0.14, 0.42, 0.03),
            radius_a: 0.12,
            radius_b: 0.075,
        };
        let (min, max) = t.bounds();
        // Points just outside the box are outside the solid
        for p in [min - DVec3::splat(1e-3), max + DVec3::splat(1e-3)] {
            assert!(t.distance(p) > 0.0);
        }
    }

    #[test]
    fn test_validate_rejects_bad_radius() {
        let bad = Primitive::Sphere {
            center: DVec3::ZERO,
            radius: 0.0,
        };
        assert!(matches!(bad.validate("x"), Err(SdfError::InvalidRadius { .. })));

        let bad = Primitive::Ellipsoid {
            center: DVec3::ZERO,
            radii: DVec3::new(1.0, f64::NAN, 1.0),
        };
        assert!(bad.validate("x").is_err());

        let bad = Primitive::Capsule {
            a: DVec3::new(f64::INFINITY, 0.0, 0.0),
            b: DVec3::ZERO,
            radius: 1.0,
        };
        assert!(matches!(bad.validate("x"), Err(SdfError::InvalidAnchor { .. })));
    }

    #[test]
    fn test_serde_tagged_representation() {
        let s = Primitive::TaperedCapsule {
            a: DVec3::ZERO,
            b: DVec3::Y,
            radius_a: 0.1,
            radius_b: 0.05,
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"kind\":\"tapered_capsule\""));
        let back: Primitive = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
