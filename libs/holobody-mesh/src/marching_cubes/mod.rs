//! # Marching Cubes
//!
//! Extracts the iso-surface of a [`SampleGrid`] as an indexed mesh.
//!
//! ## Algorithm Overview
//!
//! 1. Every lattice edge whose end values straddle the iso-level gets one
//!    vertex, placed by linear interpolation. Edges are keyed by their
//!    origin node and axis, so neighbouring cells share vertices.
//! 2. Every cell looks up its corner-sign case in the 256-entry table and
//!    emits triangles over its edge vertices.
//!
//! A node is inside when its value is strictly below the iso-level.
//! Triangles wind counter-clockwise seen from outside, so face normals
//! point toward increasing field values.
//!
//! ## Parallelism
//!
//! Both phases run per z slab on `rayon`. Each slab fills its own buffers;
//! global vertex indices are assigned afterwards in slab order, so the
//! output does not depend on scheduling.

mod tables;


use config::constants::ISO_LEVEL;
use glam::DVec3;
use rayon::prelude::*;
use tracing::debug;

use crate::grid::SampleGrid;
use crate::mesh::Mesh;
use tables::{case_triangles, CORNERS, EDGE_LATTICE};

const NO_VERTEX: u32 = u32::MAX;

/// Surface vertices found on the lattice edges leaving one z plane.
struct PlaneVertices {
    positions: Vec<DVec3>,
    /// Vertex id per node and axis (x, y, z), or [`NO_VERTEX`].
    ids: [Vec<u32>; 3],
}

/// Extracts the zero level set (see [`ISO_LEVEL`]).
///
/// # Example
///
/// ```rust
/// use holobody_mesh::{grid::sample, marching_cubes, GridSpec};
/// use holobody_sdf::Primitive;
/// use glam::DVec3;
///
/// let ball = Primitive::Sphere { center: DVec3::ZERO, radius: 0.6 };
/// let grid = sample(&ball, &GridSpec::cube(-1.0, 1.0, 16).unwrap()).unwrap();
/// let mesh = marching_cubes(&grid);
/// assert!(mesh.is_closed());
/// assert_eq!(mesh.euler_characteristic(), 2);
/// ```
pub fn marching_cubes(grid: &SampleGrid) -> Mesh {
    extract_isosurface(grid, ISO_LEVEL)
}

/// Extracts the level set `value == iso`.
///
/// A [`SampleGrid`] only exists for a validated spec, so every axis has at
/// least two nodes. An iso-surface that leaves the grid is clipped at the grid bounds and
/// comes out open there. A grid with no crossings gives an empty mesh.
pub fn extract_isosurface(grid: &SampleGrid, iso: f64) -> Mesh {
    let [_, _, nz] = grid.spec().resolution;

    let mut planes: Vec<PlaneVertices> = (0..nz)
        .into_par_iter()
        .map(|iz| plane_vertices(grid, iso, iz))
        .collect();

    let mut offsets = Vec::with_capacity(planes.len());
    let mut total = 0u32;
    for plane in &planes {
        offsets.push(total);
        total += plane.positions.len() as u32;
    }
    planes
        .par_iter_mut()
        .zip(offsets.par_iter())
        .for_each(|(plane, &offset)| {
            for ids in &mut plane.ids {
                for id in ids.iter_mut().filter(|id| **id != NO_VERTEX) {
                    *id += offset;
                }
            }
        });

    let slabs: Vec<Vec<[u32; 3]>> = (0..nz - 1)
        .into_par_iter()
        .map(|iz| slab_triangles(grid, iso, &planes[iz], &planes[iz + 1], iz))
        .collect();

    let mut vertices = Vec::with_capacity(total as usize);
    for plane in &planes {
        vertices.extend_from_slice(&plane.positions);
    }
    let triangles: Vec<[u32; 3]> = slabs.into_iter().flatten().collect();

    debug!(
        vertices = vertices.len(),
        triangles = triangles.len(),
        iso,
        "Extracted iso-surface"
    );

    Mesh::from_parts(vertices, triangles)
}

fn plane_vertices(grid: &SampleGrid, iso: f64, iz: usize) -> PlaneVertices {
    let spec = grid.spec();
    let [nx, ny, nz] = spec.resolution;
    let mut positions = Vec::new();
    let mut ids = [
        vec![NO_VERTEX; nx * ny],
        vec![NO_VERTEX; nx * ny],
        vec![NO_VERTEX; nx * ny],
    ];

    for iy in 0..ny {
        for ix in 0..nx {
            let value = grid.get(ix, iy, iz);
            let neighbours = [
                (ix + 1 < nx).then(|| [ix + 1, iy, iz]),
                (iy + 1 < ny).then(|| [ix, iy + 1, iz]),
                (iz + 1 < nz).then(|| [ix, iy, iz + 1]),
            ];
            for (axis, neighbour) in neighbours.into_iter().enumerate() {
                let Some([jx, jy, jz]) = neighbour else {
                    continue;
                };
                let other = grid.get(jx, jy, jz);
                if (value < iso) == (other < iso) {
                    continue;
                }
                let t = (iso - value) / (other - value);
                let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
                let from = spec.position(ix, iy, iz);
                let to = spec.position(jx, jy, jz);
                ids[axis][ix + nx * iy] = positions.len() as u32;
                positions.push(from.lerp(to, t));
            }
        }
    }

    PlaneVertices { positions, ids }
}

fn slab_triangles(
    grid: &SampleGrid,
    iso: f64,
    lower: &PlaneVertices,
    upper: &PlaneVertices,
    iz: usize,
) -> Vec<[u32; 3]> {
    let [nx, ny, _] = grid.spec().resolution;
    let mut triangles = Vec::new();

    for iy in 0..ny - 1 {
        for ix in 0..nx - 1 {
            let mut case = 0usize;
            for (corner, [dx, dy, dz]) in CORNERS.iter().enumerate() {
                if grid.get(ix + dx, iy + dy, iz + dz) < iso {
                    case |= 1 << corner;
                }
            }

            let cell_triangles = case_triangles(case);
            if cell_triangles.is_empty() {
                continue;
            }

            let vertex_id = |edge: u8| {
                let ([dx, dy, dz], axis) = EDGE_LATTICE[edge as usize];
                let plane = if dz == 0 { lower } else { upper };
                let id = plane.ids[axis][(ix + dx) + nx * (iy + dy)];
                debug_assert_ne!(id, NO_VERTEX, "edge {edge} of cell ({ix}, {iy}, {iz})");
                id
            };

            for tri in cell_triangles {
                triangles.push([vertex_id(tri[0]), vertex_id(tri[1]), vertex_id(tri[2])]);
            }
        }
    }

    triangles
}
