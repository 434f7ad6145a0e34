//! # Composed Field
//!
//! An ordered list of `(primitive, blend radius)` pairs evaluated as a pure
//! left fold through [`smooth_min`]. The fold is seeded with
//! [`EMPTY_FIELD_DISTANCE`], so the first part enters unchanged and an empty
//! field is everywhere outside.

use config::constants::EMPTY_FIELD_DISTANCE;
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::blend::smooth_min;
use crate::primitives::Primitive;

/// Anything that can be sampled as a signed distance.
///
/// Implementors must be pure: the same point always yields the same value.
/// `Sync` is required so samplers may evaluate from several threads.
pub trait DistanceField: Sync {
    /// Signed distance at `point` (negative inside).
    fn distance(&self, point: DVec3) -> f64;
}

impl DistanceField for Primitive {
    #[inline]
    fn distance(&self, point: DVec3) -> f64 {
        Primitive::distance(self, point)
    }
}

impl<F> DistanceField for F
where
    F: Fn(DVec3) -> f64 + Sync,
{
    #[inline]
    fn distance(&self, point: DVec3) -> f64 {
        self(point)
    }
}

/// One named entry of a composed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPart {
    /// Body-part name, unique within a composition.
    pub name: String,
    /// The primitive shape.
    pub primitive: Primitive,
    /// Blend radius used when folding this part into the running field.
    pub blend: f64,
}

/// An immutable, ordered composition of blended primitives.
///
/// # Example
///
/// ```rust
/// use holobody_sdf::{ComposedField, DistanceField, Primitive};
/// use glam::DVec3;
///
/// let field = ComposedField::new()
///     .with_part("left", Primitive::Sphere { center: DVec3::new(-0.5, 0.0, 0.0), radius: 1.0 }, 0.3)
///     .with_part("right", Primitive::Sphere { center: DVec3::new(0.5, 0.0, 0.0), radius: 1.0 }, 0.3);
///
/// assert_eq!(field.len(), 2);
/// assert!(field.distance(DVec3::ZERO) < 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComposedField {
    parts: Vec<FieldPart>,
}

impl ComposedField {
    /// Creates an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a field from an ordered list of parts.
    pub fn from_parts(parts: Vec<FieldPart>) -> Self {
        Self { parts }
    }

    /// Returns the field with one more part appended.
    #[must_use]
    pub fn with_part(mut self, name: impl Into<String>, primitive: Primitive, blend: f64) -> Self {
        self.parts.push(FieldPart {
            name: name.into(),
            primitive,
            blend,
        });
        self
    }

    /// Parts in fold order.
    #[inline]
    pub fn parts(&self) -> &[FieldPart] {
        &self.parts
    }

    /// Number of parts.
    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns true if the field has no parts.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Looks up a part by name.
    pub fn part(&self, name: &str) -> Option<&FieldPart> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Evaluates the blended field at `point`.
    #[inline]
    pub fn evaluate(&self, point: DVec3) -> f64 {
        self.parts.iter().fold(EMPTY_FIELD_DISTANCE, |acc, part| {
            smooth_min(acc, part.primitive.distance(point), part.blend)
        })
    }

    /// Axis-aligned bounds of the composed solid, or `None` for an empty field.
    ///
    /// The union of primitive bounds, padded by a quarter of the largest
    /// blend radius. A single smooth-min step lowers the field by at most
    /// `k / 4`, so this is an estimate of how far a fillet bulges past its
    /// primitives rather than a strict bound for long fold chains.
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        let first = self.parts.first()?;
        let (mut min, mut max) = first.primitive.bounds();
        let mut max_blend = first.blend;
        for part in &self.parts[1..] {
            let (lo, hi) = part.primitive.bounds();
            min = min.min(lo);
            max = max.max(hi);
            max_blend = max_blend.max(part.blend);
        }
        let pad = DVec3::splat(max_blend.max(0.0) * 0.25);
        Some((min - pad, max + pad))
    }
}

impl DistanceField for ComposedField {
    #[inline]
    fn distance(&self, point: DVec3) -> f64 {
        self.evaluate(point)
    }
}
