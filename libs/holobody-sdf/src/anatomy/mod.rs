//! # Anatomy Composer
//!
//! Body presets are plain data: named groups of primitives with per-part
//! blend radii, optionally mirrored across an axis. [`compose`] flattens a
//! preset into a [`ComposedField`] in canonical order.
//!
//! ## Mirroring
//!
//! Parts are written for the positive side of the mirror axis. A mirrored
//! group expands side-major: every part reflected to the negative side
//! first, then every part as written. Expanded names carry a `.-x` / `.+x`
//! suffix.
//!
//! ## Example
//!
//! ```rust
//! use holobody_sdf::{compose, BodyPreset, DistanceField};
//! use glam::DVec3;
//!
//! let preset = BodyPreset::athletic();
//! preset.validate().unwrap();
//!
//! let field = compose(&preset);
//! // The chest is inside, a point far above the head is not.
//! assert!(field.distance(DVec3::new(0.0, -0.5, 0.0)) < 0.0);
//! assert!(field.distance(DVec3::new(0.0, -1.5, 0.0)) > 0.0);
//! ```

mod athletic;


use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SdfError, SdfResult};
use crate::field::{ComposedField, FieldPart};
use crate::primitives::{Axis, Primitive};

/// One body part: a primitive and the radius it is blended in with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDescriptor {
    /// Part name, e.g. `"thigh"`.
    pub name: String,
    /// Shape in model space (positive side for mirrored groups).
    pub primitive: Primitive,
    /// Blend radius toward everything composed before this part.
    #[serde(default = "default_blend")]
    pub blend: f64,
}

fn default_blend() -> f64 {
    config::constants::DEFAULT_BLEND_RADIUS
}

impl PartDescriptor {
    /// Creates a part descriptor.
    pub fn new(name: impl Into<String>, primitive: Primitive, blend: f64) -> Self {
        Self {
            name: name.into(),
            primitive,
            blend,
        }
    }
}

/// A group of parts composed together, optionally once per side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartGroup {
    /// Group name, e.g. `"arms"`.
    pub name: String,
    /// Axis to mirror across; `None` for midline groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror: Option<Axis>,
    /// Parts in composition order.
    pub parts: Vec<PartDescriptor>,
}

impl PartGroup {
    /// A group composed once, as written.
    pub fn midline(name: impl Into<String>, parts: Vec<PartDescriptor>) -> Self {
        Self {
            name: name.into(),
            mirror: None,
            parts,
        }
    }

    /// A group composed once per side of `axis`.
    pub fn mirrored(name: impl Into<String>, axis: Axis, parts: Vec<PartDescriptor>) -> Self {
        Self {
            name: name.into(),
            mirror: Some(axis),
            parts,
        }
    }

    /// Number of field parts this group expands to.
    pub fn expanded_len(&self) -> usize {
        match self.mirror {
            Some(_) => self.parts.len() * 2,
            None => self.parts.len(),
        }
    }

    fn expand_into(&self, out: &mut Vec<FieldPart>) {
        match self.mirror {
            None => out.extend(self.parts.iter().map(|part| FieldPart {
                name: part.name.clone(),
                primitive: part.primitive,
                blend: part.blend,
            })),
            Some(axis) => {
                let suffix = axis_suffix(axis);
                out.extend(self.parts.iter().map(|part| FieldPart {
                    name: format!("{}.-{}", part.name, suffix),
                    primitive: part.primitive.mirrored(axis),
                    blend: part.blend,
                }));
                out.extend(self.parts.iter().map(|part| FieldPart {
                    name: format!("{}.+{}", part.name, suffix),
                    primitive: part.primitive,
                    blend: part.blend,
                }));
            }
        }
    }
}

fn axis_suffix(axis: Axis) -> &'static str {
    match axis {
        Axis::X => "x",
        Axis::Y => "y",
        Axis::Z => "z",
    }
}

/// A complete, loadable body description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPreset {
    /// Preset name, e.g. `"athletic"`.
    pub name: String,
    /// Groups in canonical order (torso, limbs, extremities).
    pub groups: Vec<PartGroup>,
}

impl Default for BodyPreset {
    fn default() -> Self {
        Self::athletic()
    }
}

impl BodyPreset {
    /// Creates a preset from groups.
    pub fn new(name: impl Into<String>, groups: Vec<PartGroup>) -> Self {
        Self {
            name: name.into(),
            groups,
        }
    }

    /// The built-in athletic adult figure, about 7.5 heads tall.
    pub fn athletic() -> Self {
        athletic::preset()
    }

    /// Parses a preset from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::Parse`] for malformed JSON and any error from
    /// [`BodyPreset::validate`].
    pub fn from_json(json: &str) -> SdfResult<Self> {
        let preset: Self = serde_json::from_str(json)?;
        preset.validate()?;
        Ok(preset)
    }

    /// Serializes the preset to pretty-printed JSON.
    pub fn to_json(&self) -> SdfResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total number of field parts after mirroring.
    pub fn part_count(&self) -> usize {
        self.groups.iter().map(PartGroup::expanded_len).sum()
    }

    /// Checks every primitive and blend radius.
    ///
    /// # Errors
    ///
    /// - [`SdfError::EmptyPreset`] if no group contains a part
    /// - [`SdfError::InvalidRadius`] / [`SdfError::InvalidAnchor`] from the primitives
    /// - [`SdfError::InvalidBlend`] for negative or non-finite blend radii
    pub fn validate(&self) -> SdfResult<()> {
        if self.part_count() == 0 {
            return Err(SdfError::EmptyPreset(self.name.clone()));
        }
        for group in &self.groups {
            for part in &group.parts {
                part.primitive.validate(&part.name)?;
                if !(part.blend.is_finite() && part.blend >= 0.0) {
                    return Err(SdfError::InvalidBlend {
                        part: part.name.clone(),
                        blend: part.blend,
                    });
                }
            }
        }
        Ok(())
    }

    /// Flattens the preset into a composed field. See [`compose`].
    pub fn compose(&self) -> ComposedField {
        compose(self)
    }
}

/// Flattens a preset into a [`ComposedField`].
///
/// Groups are expanded in order; mirrored groups expand side-major. The
/// result depends only on the preset, so equal presets give equal fields.
pub fn compose(preset: &BodyPreset) -> ComposedField {
    let mut parts = Vec::with_capacity(preset.part_count());
    for group in &preset.groups {
        group.expand_into(&mut parts);
        debug!(
            group = %group.name,
            parts = group.expanded_len(),
            mirrored = group.mirror.is_some(),
            "Composed part group"
        );
    }
    debug!(preset = %preset.name, parts = parts.len(), "Composed body preset");
    ComposedField::from_parts(parts)
}
