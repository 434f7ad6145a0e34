//! Cell topology and the 256-case triangle table.
//!
//! The table is traced rather than transcribed. For every case, each cube
//! face contributes the segments where the iso-surface crosses it; the
//! segments chain into closed loops around the cell and each loop is
//! fan-triangulated. A face with four crossings (diagonal corners inside)
//! always cuts off its inside corners separately. That choice depends only
//! on the face's own corner signs, so the two cells sharing a face agree
//! and the extracted surface has no cracks.
//!
//! Segments are oriented with the inside region on their left as seen from
//! outside the cube. The loops are then the boundary of the inside part of
//! the cube surface, which runs opposite to the boundary of the iso-surface
//! patch; reversing them makes every triangle counter-clockwise as seen
//! from the outside (toward increasing field).

use std::sync::OnceLock;

use glam::DVec3;

/// Corner offsets `(dx, dy, dz)` of a cell.
pub(crate) const CORNERS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
];

/// Corner pairs of the twelve cell edges.
pub(crate) const EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Lattice edge behind each cell edge: origin node offset and axis.
///
/// Edge `e` of the cell at `(ix, iy, iz)` is the lattice edge leaving node
/// `(ix + dx, iy + dy, iz + dz)` along `axis`.
pub(crate) const EDGE_LATTICE: [([usize; 3], usize); 12] = [
    ([0, 0, 0], 0),
    ([1, 0, 0], 1),
    ([0, 1, 0], 0),
    ([0, 0, 0], 1),
    ([0, 0, 1], 0),
    ([1, 0, 1], 1),
    ([0, 1, 1], 0),
    ([0, 0, 1], 1),
    ([0, 0, 0], 2),
    ([1, 0, 0], 2),
    ([1, 1, 0], 2),
    ([0, 1, 0], 2),
];

/// A cube face: corners in cyclic order, the edge leaving each corner
/// toward the next one, and the outward normal.
struct Face {
    corners: [usize; 4],
    edges: [usize; 4],
    normal: DVec3,
}

const FACES: [Face; 6] = [
    Face { corners: [0, 1, 2, 3], edges: [0, 1, 2, 3], normal: DVec3::NEG_Z },
    Face { corners: [4, 5, 6, 7], edges: [4, 5, 6, 7], normal: DVec3::Z },
    Face { corners: [0, 1, 5, 4], edges: [0, 9, 4, 8], normal: DVec3::NEG_Y },
    Face { corners: [3, 2, 6, 7], edges: [2, 10, 6, 11], normal: DVec3::Y },
    Face { corners: [0, 3, 7, 4], edges: [3, 11, 7, 8], normal: DVec3::NEG_X },
    Face { corners: [1, 2, 6, 5], edges: [1, 10, 5, 9], normal: DVec3::X },
];

/// Triangles (as cell-edge triples) for a corner-sign case.
///
/// Bit `c` of `case` is set when corner `c` is inside.
#[inline]
pub(crate) fn case_triangles(case: usize) -> &'static [[u8; 3]] {
    &table()[case]
}

fn table() -> &'static [Vec<[u8; 3]>] {
    static TABLE: OnceLock<Vec<Vec<[u8; 3]>>> = OnceLock::new();
    TABLE.get_or_init(|| (0..256).map(trace_case).collect())
}

fn corner_position(corner: usize) -> DVec3 {
    let [x, y, z] = CORNERS[corner];
    DVec3::new(x as f64, y as f64, z as f64)
}

fn edge_midpoint(edge: usize) -> DVec3 {
    let [a, b] = EDGES[edge];
    (corner_position(a) + corner_position(b)) * 0.5
}

fn trace_case(case: usize) -> Vec<[u8; 3]> {
    let inside = |corner: usize| case & (1 << corner) != 0;
    let mut next: [Option<usize>; 12] = [None; 12];

    for Face {
        corners,
        edges: face_edges,
        normal,
    } in FACES
    {
        let crossing: Vec<usize> = (0..4)
            .filter(|&i| inside(corners[i]) != inside(corners[(i + 1) % 4]))
            .collect();

        // (edge, edge, reference corner)
        let segments: Vec<(usize, usize, usize)> = match crossing.len() {
            2 => vec![(face_edges[crossing[0]], face_edges[crossing[1]], corners[0])],
            4 => (0..4)
                .filter(|&i| inside(corners[i]))
                .map(|i| (face_edges[(i + 3) % 4], face_edges[i], corners[i]))
                .collect(),
            _ => Vec::new(),
        };

        for (a, b, reference) in segments {
            let p = edge_midpoint(a);
            let q = edge_midpoint(b);
            let left = normal.cross(q - p);
            let side = left.dot(corner_position(reference) - (p + q) * 0.5);
            let (from, to) = if (side > 0.0) == inside(reference) {
                (a, b)
            } else {
                (b, a)
            };
            next[from] = Some(to);
        }
    }

    let mut visited = [false; 12];
    let mut triangles = Vec::new();
    for start in 0..12 {
        if visited[start] || next[start].is_none() {
            continue;
        }
        let mut ring = Vec::with_capacity(12);
        let mut edge = start;
        loop {
            visited[edge] = true;
            ring.push(edge as u8);
            match next[edge] {
                Some(n) if n == start => break,
                Some(n) if !visited[n] => edge = n,
                _ => {
                    debug_assert!(false, "open loop in case {case}");
                    break;
                }
            }
        }
        ring.reverse();
        let root = fan_root(&ring);
        ring.rotate_left(root);
        for i in 1..ring.len().saturating_sub(1) {
            triangles.push([ring[0], ring[i], ring[i + 1]]);
        }
    }
    triangles
}

fn shares_face(a: u8, b: u8) -> bool {
    FACES.iter().any(|face| {
        face.edges.contains(&(a as usize)) && face.edges.contains(&(b as usize))
    })
}

/// Picks a fan root whose diagonals never join two vertices on one cube
/// face. Only face-bound edges can be shared with a neighbouring cell, so
/// such diagonals stay private to the cell. Falls back to the first vertex.
fn fan_root(ring: &[u8]) -> usize {
    let m = ring.len();
    (0..m)
        .find(|&r| (2..m.saturating_sub(1)).all(|k| !shares_face(ring[r], ring[(r + k) % m])))
        .unwrap_or(0)
}
