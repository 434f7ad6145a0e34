//! The built-in athletic figure.
//!
//! Model space: the navel sits near the origin, y grows toward the feet and
//! z toward the front. Head height is about 0.22 units.

use glam::DVec3;

use super::{BodyPreset, PartDescriptor, PartGroup};
use crate::primitives::{Axis, Primitive};

const fn v(x: f64, y: f64, z: f64) -> DVec3 {
    DVec3::new(x, y, z)
}

fn sphere(name: &str, center: DVec3, radius: f64, blend: f64) -> PartDescriptor {
    PartDescriptor::new(name, Primitive::Sphere { center, radius }, blend)
}

fn ellipsoid(name: &str, center: DVec3, radii: DVec3, blend: f64) -> PartDescriptor {
    PartDescriptor::new(name, Primitive::Ellipsoid { center, radii }, blend)
}

fn capsule(name: &str, a: DVec3, b: DVec3, radius: f64, blend: f64) -> PartDescriptor {
    PartDescriptor::new(name, Primitive::Capsule { a, b, radius }, blend)
}

fn tapered(name: &str, a: DVec3, b: DVec3, radii: (f64, f64), blend: f64) -> PartDescriptor {
    PartDescriptor::new(
        name,
        Primitive::TaperedCapsule {
            a,
            b,
            radius_a: radii.0,
            radius_b: radii.1,
        },
        blend,
    )
}

// Right-side joints; the left side is produced by mirroring across x.
const SHOULDER: DVec3 = v(0.23, -0.69, -0.01);
const ELBOW: DVec3 = v(0.28, -0.36, 0.03);
const WRIST: DVec3 = v(0.31, -0.08, 0.10);
const HIP: DVec3 = v(0.12, -0.12, 0.0);
const KNEE: DVec3 = v(0.14, 0.42, 0.03);
const ANKLE: DVec3 = v(0.15, 0.90, -0.03);

pub(super) fn preset() -> BodyPreset {
    let head = PartGroup::midline(
        "head",
        vec![
            ellipsoid("head", v(0.0, -0.92, 0.02), v(0.07, 0.088, 0.078), 0.04),
            tapered("jaw", v(0.0, -0.90, 0.03), v(0.0, -0.80, 0.06), (0.055, 0.038), 0.03),
            capsule("neck", v(0.0, -0.78, -0.02), v(0.0, -0.68, -0.02), 0.048, 0.05),
        ],
    );

    let shoulders = PartGroup::midline(
        "trapezius",
        vec![tapered(
            "trapezius",
            v(-0.12, -0.72, -0.03),
            v(0.12, -0.72, -0.03),
            (0.02, 0.02),
            0.08,
        )],
    );

    let chest = PartGroup::mirrored(
        "pectorals",
        Axis::X,
        vec![ellipsoid("pectoral", v(0.09, -0.60, 0.04), v(0.085, 0.065, 0.03), 0.06)],
    );

    let mut core = vec![
        tapered("ribcage", v(0.0, -0.65, -0.04), v(0.0, -0.35, -0.02), (0.16, 0.11), 0.10),
        capsule("abdomen", v(0.0, -0.45, 0.07), v(0.0, -0.22, 0.06), 0.065, 0.04),
    ];
    // Rectus abdominis separations
    for (i, y) in [-0.40, -0.32, -0.24].into_iter().enumerate() {
        core.push(capsule(
            &format!("abs_separation_{}", i + 1),
            v(-0.05, y, 0.07),
            v(0.05, y, 0.07),
            0.006,
            0.03,
        ));
    }
    let core = PartGroup::midline("core", core);

    let arms = PartGroup::mirrored(
        "arms",
        Axis::X,
        vec![
            capsule("clavicle", v(0.0, -0.70, 0.02), v(0.20, -0.71, 0.0), 0.022, 0.03),
            ellipsoid("deltoid", SHOULDER, v(0.085, 0.085, 0.08), 0.05),
            tapered("upper_arm", SHOULDER, ELBOW, (0.065, 0.055), 0.04),
            tapered("forearm", ELBOW, WRIST, (0.052, 0.038), 0.04),
            ellipsoid("hand", v(0.315, -0.03, 0.11), v(0.035, 0.05, 0.02), 0.03),
        ],
    );

    let calf_muscle = KNEE * 0.7 + ANKLE * 0.3;
    let legs = PartGroup::mirrored(
        "legs",
        Axis::X,
        vec![
            sphere("glute", v(HIP.x, HIP.y, -0.06), 0.11, 0.08),
            tapered("thigh", HIP, KNEE, (0.12, 0.075), 0.06),
            sphere("knee", KNEE, 0.055, 0.03),
            tapered("calf", KNEE, ANKLE, (0.065, 0.045), 0.05),
            ellipsoid(
                "calf_muscle",
                v(calf_muscle.x, calf_muscle.y, KNEE.z - 0.04),
                v(0.048, 0.09, 0.035),
                0.06,
            ),
            // Below the calf cap: each foot is a separate shell
            ellipsoid(
                "foot",
                ANKLE + v(0.02, 0.12, 0.06),
                v(0.04, 0.02, 0.07),
                0.04,
            ),
        ],
    );

    BodyPreset::new(
        "athletic",
        vec![head, shoulders, chest, core, arms, legs],
    )
}
