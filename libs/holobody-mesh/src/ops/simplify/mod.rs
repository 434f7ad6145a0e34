//! # Mesh Simplification
//!
//! Quadric-error-metric edge collapse.
//!
//! ## Algorithm
//!
//! 1. Every vertex gets the quadric of its adjacent face planes.
//! 2. Every edge is queued with the cost of merging its endpoints at the
//!    position that minimizes their summed quadric.
//! 3. The cheapest edge is collapsed until the triangle budget is met.
//!
//! The queue is lazy: entries carry the version stamps of both endpoints
//! and are discarded when popped if either vertex changed since. A collapse
//! is rejected if it would break the link condition (non-manifold result),
//! flip a surrounding face, or leave a zero-area face.

mod params;
mod quadric;
mod result;

#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use config::constants::DEGENERATE_AREA_EPSILON;
use glam::DVec3;
use tracing::{debug, info, warn};

use crate::error::MeshError;
use crate::mesh::Mesh;
pub use params::DecimateParams;
use quadric::Quadric;
pub use result::DecimationResult;

/// A queued edge collapse: `remove` merges into `keep` at `position`.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    cost: f64,
    keep: u32,
    remove: u32,
    stamps: (u32, u32),
    position: DVec3,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour; ties broken by vertex ids
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| (other.keep, other.remove).cmp(&(self.keep, self.remove)))
    }
}

/// Why a popped candidate was not applied.
enum Verdict {
    Apply,
    Stale,
    Reject,
}

/// Working state of one decimation run.
struct Decimator<'a> {
    params: &'a DecimateParams,
    positions: Vec<DVec3>,
    quadrics: Vec<Quadric>,
    versions: Vec<u32>,
    vertex_alive: Vec<bool>,
    boundary: Vec<bool>,
    faces: Vec<[u32; 3]>,
    face_alive: Vec<bool>,
    vertex_faces: Vec<Vec<usize>>,
    active_faces: usize,
}

/// Decimates a mesh with quadric edge collapse.
///
/// Returns a new mesh; normals are not carried over. An empty mesh, or one
/// already within budget, passes through unchanged. Missing the budget is
/// not an error: the result reports the reached count and a warning is
/// logged.
///
/// # Errors
///
/// Returns [`MeshError::InvalidDecimation`] if the parameters are out of
/// range.
///
/// # Example
///
/// ```rust
/// use holobody_mesh::{grid::sample, marching_cubes, ops::decimate, DecimateParams, GridSpec};
/// use holobody_sdf::Primitive;
/// use glam::DVec3;
///
/// let ball = Primitive::Sphere { center: DVec3::ZERO, radius: 0.8 };
/// let mesh = marching_cubes(&sample(&ball, &GridSpec::cube(-1.0, 1.0, 24).unwrap()).unwrap());
/// let result = decimate(&mesh, &DecimateParams::with_target_ratio(0.25)).unwrap();
/// assert!(result.final_triangles < mesh.triangle_count());
/// ```
pub fn decimate(mesh: &Mesh, params: &DecimateParams) -> Result<DecimationResult, MeshError> {
    params.validate()?;

    let original_triangles = mesh.triangle_count();
    let target = params.target_for(original_triangles);

    if original_triangles == 0 || original_triangles <= target {
        return Ok(DecimationResult {
            mesh: mesh.clone(),
            original_triangles,
            final_triangles: original_triangles,
            target_triangles: target,
            collapses_performed: 0,
            collapses_rejected: 0,
        });
    }

    info!(
        original = original_triangles,
        target = target,
        "Starting mesh decimation"
    );

    let mut decimator = Decimator::new(mesh, params);
    let (collapses_performed, collapses_rejected) = decimator.run(target);
    let simplified = decimator.into_mesh();
    let final_triangles = simplified.triangle_count();

    if final_triangles > target {
        warn!(
            final_triangles,
            target, "Decimation stopped above the triangle target"
        );
    }

    let result = DecimationResult {
        mesh: simplified,
        original_triangles,
        final_triangles,
        target_triangles: target,
        collapses_performed,
        collapses_rejected,
    };
    info!("{result}");
    Ok(result)
}

impl<'a> Decimator<'a> {
    fn new(mesh: &Mesh, params: &'a DecimateParams) -> Self {
        let vertex_count = mesh.vertex_count();
        let positions = mesh.vertices().to_vec();
        let faces = mesh.triangles().to_vec();

        let mut quadrics = vec![Quadric::default(); vertex_count];
        let mut vertex_faces = vec![Vec::new(); vertex_count];
        for (f, &[a, b, c]) in faces.iter().enumerate() {
            let plane = Quadric::from_triangle(
                positions[a as usize],
                positions[b as usize],
                positions[c as usize],
            );
            for v in [a, b, c] {
                if let Some(q) = plane {
                    quadrics[v as usize] += q;
                }
                vertex_faces[v as usize].push(f);
            }
        }

        let mut boundary = vec![false; vertex_count];
        for ((a, b), count) in mesh.edge_face_counts() {
            if count == 1 {
                boundary[a as usize] = true;
                boundary[b as usize] = true;
            }
        }

        Self {
            params,
            positions,
            quadrics,
            versions: vec![0; vertex_count],
            vertex_alive: vec![true; vertex_count],
            boundary,
            face_alive: vec![true; faces.len()],
            active_faces: faces.len(),
            faces,
            vertex_faces,
        }
    }

    /// Collapses edges until `target` faces remain or the queue runs dry.
    /// Returns (performed, rejected).
    fn run(&mut self, target: usize) -> (usize, usize) {
        let mut edges: Vec<(u32, u32)> = self
            .faces
            .iter()
            .flat_map(|&[a, b, c]| [(a, b), (b, c), (c, a)])
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        edges.sort_unstable();
        edges.dedup();

        let mut heap: BinaryHeap<Candidate> = edges
            .into_iter()
            .map(|(a, b)| self.candidate(a, b))
            .collect();

        let mut performed = 0;
        let mut rejected = 0;
        while self.active_faces > target {
            let Some(candidate) = heap.pop() else {
                break;
            };
            if !self.is_current(&candidate) {
                continue;
            }
            if let Some(max_error) = self.params.max_error {
                if candidate.cost > max_error {
                    debug!(cost = candidate.cost, max_error, "Decimation hit error limit");
                    break;
                }
            }
            match self.check(&candidate) {
                Verdict::Stale => continue,
                Verdict::Reject => {
                    rejected += 1;
                    continue;
                }
                Verdict::Apply => {}
            }

            self.collapse(&candidate);
            performed += 1;

            let keep = candidate.keep;
            for neighbor in self.neighbors(keep) {
                heap.push(self.candidate(keep, neighbor));
            }
        }
        (performed, rejected)
    }

    fn is_current(&self, c: &Candidate) -> bool {
        let (k, r) = (c.keep as usize, c.remove as usize);
        self.vertex_alive[k]
            && self.vertex_alive[r]
            && self.versions[k] == c.stamps.0
            && self.versions[r] == c.stamps.1
    }

    /// Builds the candidate for edge `(a, b)`.
    fn candidate(&self, a: u32, b: u32) -> Candidate {
        // Keep the boundary vertex so open rims do not shrink
        let (keep, remove) = if self.boundary[b as usize] && !self.boundary[a as usize] {
            (b, a)
        } else {
            (a, b)
        };
        let (ki, ri) = (keep as usize, remove as usize);
        let quadric = self.quadrics[ki] + self.quadrics[ri];
        let (pk, pr) = (self.positions[ki], self.positions[ri]);
        let midpoint = (pk + pr) * 0.5;

        let position = if self.boundary[ki] != self.boundary[ri] {
            pk
        } else {
            let reach = 2.0 * pk.distance(pr);
            match quadric.optimal_point() {
                Some(p) if p.distance(midpoint) <= reach => p,
                _ => [pk, pr, midpoint]
                    .into_iter()
                    .min_by(|x, y| quadric.evaluate(*x).total_cmp(&quadric.evaluate(*y)))
                    .unwrap_or(midpoint),
            }
        };

        Candidate {
            cost: quadric.evaluate(position).max(0.0),
            keep,
            remove,
            stamps: (self.versions[ki], self.versions[ri]),
            position,
        }
    }

    fn alive_faces(&self, v: u32) -> impl Iterator<Item = usize> + '_ {
        self.vertex_faces[v as usize]
            .iter()
            .copied()
            .filter(|&f| self.face_alive[f])
    }

    fn neighbors(&self, v: u32) -> Vec<u32> {
        let mut out: Vec<u32> = self
            .alive_faces(v)
            .flat_map(|f| self.faces[f])
            .filter(|&u| u != v)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    fn check(&self, c: &Candidate) -> Verdict {
        let (keep, remove) = (c.keep, c.remove);
        let (ki, ri) = (keep as usize, remove as usize);

        let shared: Vec<usize> = self
            .alive_faces(keep)
            .filter(|&f| self.faces[f].contains(&remove))
            .collect();
        if shared.is_empty() {
            return Verdict::Stale;
        }

        if self.params.preserve_boundary && (self.boundary[ki] || self.boundary[ri]) {
            return Verdict::Reject;
        }
        // Two rim vertices joined through the interior would pinch the surface
        if self.boundary[ki] && self.boundary[ri] && shared.len() != 1 {
            return Verdict::Reject;
        }

        // Link condition: common neighbours are exactly the opposite vertices
        // of the shared faces
        let keep_neighbors = self.neighbors(keep);
        let remove_neighbors = self.neighbors(remove);
        let common = keep_neighbors
            .iter()
            .filter(|v| remove_neighbors.binary_search(v).is_ok())
            .count();
        let mut opposite: Vec<u32> = shared
            .iter()
            .flat_map(|&f| self.faces[f])
            .filter(|&v| v != keep && v != remove)
            .collect();
        opposite.sort_unstable();
        opposite.dedup();
        if common != opposite.len() || opposite.len() != shared.len() {
            return Verdict::Reject;
        }
        // Collapsing an edge of a tetrahedron leaves a doubled triangle
        if keep_neighbors.len() <= 3 && remove_neighbors.len() <= 3 {
            return Verdict::Reject;
        }

        let moved = |v: u32| {
            if v == keep || v == remove {
                c.position
            } else {
                self.positions[v as usize]
            }
        };
        for f in self.alive_faces(keep).chain(self.alive_faces(remove)) {
            if shared.contains(&f) {
                continue;
            }
            let [a, b, d] = self.faces[f];
            let (pa, pb, pd) = (
                self.positions[a as usize],
                self.positions[b as usize],
                self.positions[d as usize],
            );
            let before = (pb - pa).cross(pd - pa);
            let (qa, qb, qd) = (moved(a), moved(b), moved(d));
            let after = (qb - qa).cross(qd - qa);
            if after.length_squared() <= DEGENERATE_AREA_EPSILON || before.dot(after) <= 0.0 {
                return Verdict::Reject;
            }
        }
        Verdict::Apply
    }

    fn collapse(&mut self, c: &Candidate) {
        let (keep, remove) = (c.keep, c.remove);
        let (ki, ri) = (keep as usize, remove as usize);

        self.positions[ki] = c.position;
        let merged = self.quadrics[ri];
        self.quadrics[ki] += merged;
        self.boundary[ki] |= self.boundary[ri];
        self.vertex_alive[ri] = false;
        self.versions[ki] += 1;

        let moved = std::mem::take(&mut self.vertex_faces[ri]);
        let mut touched = Vec::new();
        for f in moved {
            if !self.face_alive[f] {
                continue;
            }
            if self.faces[f].contains(&keep) {
                self.face_alive[f] = false;
                self.active_faces -= 1;
                touched.extend(self.faces[f].iter().copied().filter(|&v| v != remove));
            } else {
                for v in self.faces[f].iter_mut() {
                    if *v == remove {
                        *v = keep;
                    }
                }
                self.vertex_faces[ki].push(f);
            }
        }
        touched.push(keep);
        for v in touched {
            let alive = &self.face_alive;
            self.vertex_faces[v as usize].retain(|&f| alive[f]);
        }
    }

    /// Compacts surviving faces and referenced vertices into a new mesh.
    fn into_mesh(self) -> Mesh {
        let triangles: Vec<[u32; 3]> = self
            .faces
            .iter()
            .zip(&self.face_alive)
            .filter(|(_, alive)| **alive)
            .map(|(&face, _)| face)
            .collect();
        let mut mesh = Mesh::from_parts(self.positions, triangles);
        mesh.remove_unreferenced_vertices();
        mesh
    }
}
