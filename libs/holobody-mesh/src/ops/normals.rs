//! # Normal Estimation
//!
//! Area-weighted vertex normals with per-component orientation repair.
//!
//! Each connected component is checked by its signed volume about its own
//! centroid. A negative volume means the component is wound inside out, so
//! its triangles are reversed before the face normals are accumulated.
//! Unnormalised cross products weight every face by twice its area.

use config::constants::DEGENERATE_AREA_EPSILON;
use glam::DVec3;
use tracing::debug;

use crate::mesh::Mesh;

/// Summary of a normal estimation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalReport {
    /// Connected components examined.
    pub components: usize,
    /// Components whose winding was reversed.
    pub flipped_components: usize,
    /// Vertices left with a zero normal (no valid adjacent face).
    pub zero_normals: usize,
}

/// Orients every component outward, then stores unit vertex normals.
///
/// Vertices with no non-degenerate adjacent face get a zero normal. An
/// empty mesh gets an empty normal buffer.
///
/// # Example
///
/// ```rust
/// use holobody_mesh::{ops::estimate_normals, Mesh};
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::ZERO);
/// mesh.add_vertex(DVec3::X);
/// mesh.add_vertex(DVec3::Y);
/// mesh.add_triangle(0, 1, 2);
/// estimate_normals(&mut mesh);
/// assert_eq!(mesh.normals().unwrap()[0], DVec3::Z);
/// ```
pub fn estimate_normals(mesh: &mut Mesh) -> NormalReport {
    let components = mesh.connected_components();
    let mut report = NormalReport {
        components: components.len(),
        ..Default::default()
    };

    for faces in &components {
        if signed_volume(mesh, faces) < 0.0 {
            mesh.flip_triangles(faces);
            report.flipped_components += 1;
        }
    }

    let mut normals = vec![DVec3::ZERO; mesh.vertex_count()];
    for i in 0..mesh.triangle_count() {
        let cross = mesh.face_cross(i);
        if cross.length_squared() <= DEGENERATE_AREA_EPSILON {
            continue;
        }
        for v in mesh.triangle(i) {
            normals[v as usize] += cross;
        }
    }
    for n in &mut normals {
        *n = n.normalize_or_zero();
        if *n == DVec3::ZERO {
            report.zero_normals += 1;
        }
    }
    mesh.set_normals(normals);

    debug!(
        components = report.components,
        flipped = report.flipped_components,
        zero_normals = report.zero_normals,
        "Estimated vertex normals"
    );
    report
}

/// Signed volume enclosed by `faces`, measured from their vertex centroid.
///
/// Positive when the faces wind counter-clockwise seen from outside.
pub fn signed_volume(mesh: &Mesh, faces: &[usize]) -> f64 {
    let mut centroid = DVec3::ZERO;
    let mut count = 0usize;
    for &f in faces {
        for v in mesh.triangle(f) {
            centroid += mesh.vertex(v);
            count += 1;
        }
    }
    if count == 0 {
        return 0.0;
    }
    centroid /= count as f64;

    faces
        .iter()
        .map(|&f| {
            let [a, b, c] = mesh.triangle(f);
            let (pa, pb, pc) = (
                mesh.vertex(a) - centroid,
                mesh.vertex(b) - centroid,
                mesh.vertex(c) - centroid,
            );
            pa.dot(pb.cross(pc))
        })
        .sum::<f64>()
        / 6.0
}
