//! # Taubin Smoothing
//!
//! Shrink-free smoothing with the uniform (umbrella) Laplacian.
//!
//! Each iteration is a smoothing pass with positive `lambda` followed by
//! an inflating pass with negative `mu`, where
//! `mu = 1 / (TAUBIN_PASS_BAND - 1 / lambda)`. The pair attenuates high
//! frequencies without the steady shrinkage of plain Laplacian smoothing.
//! Both passes are Jacobi updates: every vertex moves toward the mean of
//! its neighbours' positions from before the pass.
//!
//! Lambda is capped at `MAX_STABLE_RELAXATION` and runs are limited to
//! `MAX_SMOOTHING_ITERATIONS` pairs, which bounds the pass-band growth of
//! any accepted run to about one percent.

use config::constants::{
    DEFAULT_RELAXATION_FACTOR, DEFAULT_SMOOTHING_ITERATIONS, MAX_SMOOTHING_ITERATIONS,
    MAX_STABLE_RELAXATION, TAUBIN_PASS_BAND,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MeshError;
use crate::mesh::Mesh;

/// Parameters for Taubin smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothParams {
    /// Number of lambda/mu iteration pairs, at most
    /// `MAX_SMOOTHING_ITERATIONS`. Default: 20
    pub iterations: u32,
    /// Smoothing factor lambda, in (0, 1). Default: 0.08
    pub relaxation: f64,
    /// Keep vertices on open boundaries fixed. Default: false
    pub preserve_boundary: bool,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_SMOOTHING_ITERATIONS,
            relaxation: DEFAULT_RELAXATION_FACTOR,
            preserve_boundary: false,
        }
    }
}

impl SmoothParams {
    /// Params with the given iteration count and relaxation.
    pub fn new(iterations: u32, relaxation: f64) -> Self {
        Self {
            iterations,
            relaxation,
            ..Default::default()
        }
    }

    /// Set preserve boundary option.
    #[must_use]
    pub const fn with_preserve_boundary(mut self, preserve: bool) -> Self {
        self.preserve_boundary = preserve;
        self
    }

    /// Checks that the relaxation lies in (0, 1) and the iteration count
    /// is within `MAX_SMOOTHING_ITERATIONS`.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.iterations > MAX_SMOOTHING_ITERATIONS {
            return Err(MeshError::invalid_smoothing(format!(
                "{} iterations exceeds the limit of {MAX_SMOOTHING_ITERATIONS}",
                self.iterations
            )));
        }
        if !(self.relaxation > 0.0 && self.relaxation < 1.0) {
            return Err(MeshError::invalid_smoothing(format!(
                "relaxation {} outside (0, 1)",
                self.relaxation
            )));
        }
        Ok(())
    }

    /// The smoothing factor actually applied, capped for stability.
    pub fn lambda(&self) -> f64 {
        self.relaxation.min(MAX_STABLE_RELAXATION)
    }

    /// The inflation factor paired with [`Self::lambda`].
    pub fn mu(&self) -> f64 {
        1.0 / (TAUBIN_PASS_BAND - 1.0 / self.lambda())
    }
}

/// Statistics of a smoothing run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothResult {
    /// Number of lambda/mu pairs applied.
    pub iterations_performed: u32,
    /// Smoothing factor used.
    pub lambda: f64,
    /// Inflation factor used.
    pub mu: f64,
    /// Largest distance any vertex moved from its starting position.
    pub max_displacement: f64,
}

/// Smooths vertex positions in place.
///
/// Topology and vertex count are unchanged. Vertices referenced by no
/// triangle stay put. Stored normals are cleared since they no longer
/// match the surface.
///
/// # Errors
///
/// Returns [`MeshError::InvalidSmoothing`] if the relaxation is not in
/// (0, 1) or the iteration count is above `MAX_SMOOTHING_ITERATIONS`.
///
/// # Example
///
/// ```rust
/// use holobody_mesh::{ops::smooth, Mesh, SmoothParams};
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::ZERO);
/// mesh.add_vertex(DVec3::X);
/// mesh.add_vertex(DVec3::Y);
/// mesh.add_triangle(0, 1, 2);
/// let result = smooth(&mut mesh, &SmoothParams::default()).unwrap();
/// assert_eq!(result.iterations_performed, 20);
/// assert!(smooth(&mut mesh, &SmoothParams::new(1, 1.5)).is_err());
/// ```
pub fn smooth(mesh: &mut Mesh, params: &SmoothParams) -> Result<SmoothResult, MeshError> {
    params.validate()?;
    let (lambda, mu) = (params.lambda(), params.mu());

    if mesh.is_empty() || params.iterations == 0 {
        return Ok(SmoothResult {
            iterations_performed: 0,
            lambda,
            mu,
            max_displacement: 0.0,
        });
    }

    let neighbors = mesh.vertex_neighbors();
    let mut pinned: Vec<bool> = neighbors.iter().map(Vec::is_empty).collect();
    if params.preserve_boundary {
        for ((a, b), count) in mesh.edge_face_counts() {
            if count == 1 {
                pinned[a as usize] = true;
                pinned[b as usize] = true;
            }
        }
    }

    let start = mesh.vertices().to_vec();
    let mut scratch = start.clone();
    for _ in 0..params.iterations {
        laplacian_step(mesh.vertices_mut(), &mut scratch, &neighbors, &pinned, lambda);
        laplacian_step(mesh.vertices_mut(), &mut scratch, &neighbors, &pinned, mu);
    }
    mesh.clear_normals();

    let max_displacement = start
        .iter()
        .zip(mesh.vertices())
        .map(|(a, b)| a.distance(*b))
        .fold(0.0, f64::max);

    debug!(
        iterations = params.iterations,
        lambda, mu, max_displacement, "Applied Taubin smoothing"
    );

    Ok(SmoothResult {
        iterations_performed: params.iterations,
        lambda,
        mu,
        max_displacement,
    })
}

/// One Jacobi umbrella step: `p += factor * (mean(neighbours) - p)`.
fn laplacian_step(
    positions: &mut [DVec3],
    previous: &mut [DVec3],
    neighbors: &[Vec<u32>],
    pinned: &[bool],
    factor: f64,
) {
    previous.copy_from_slice(positions);
    for (i, p) in positions.iter_mut().enumerate() {
        if pinned[i] {
            continue;
        }
        let ring = &neighbors[i];
        let mean =
            ring.iter().map(|&n| previous[n as usize]).sum::<DVec3>() / ring.len() as f64;
        *p += factor * (mean - previous[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Regular octahedron with an outward winding.
    fn octahedron(radius: f64) -> Mesh {
        let vertices = vec![
            DVec3::X * radius,
            DVec3::NEG_X * radius,
            DVec3::Y * radius,
            DVec3::NEG_Y * radius,
            DVec3::Z * radius,
            DVec3::NEG_Z * radius,
        ];
        let triangles = vec![
            [0, 2, 4],
            [2, 1, 4],
            [1, 3, 4],
            [3, 0, 4],
            [2, 0, 5],
            [1, 2, 5],
            [3, 1, 5],
            [0, 3, 5],
        ];
        Mesh::from_parts(vertices, triangles)
    }

    #[test]
    fn test_default_params() {
        let params = SmoothParams::default();
        assert_eq!(params.iterations, 20);
        assert_relative_eq!(params.relaxation, 0.08);
        assert_relative_eq!(params.lambda(), 0.08);
        // 1 / (0.1 - 12.5)
        assert_relative_eq!(params.mu(), -1.0 / 12.4, epsilon = 1e-12);
        assert!(params.mu().abs() > params.lambda());
    }

    #[test]
    fn test_lambda_is_clamped() {
        let params = SmoothParams::new(5, 0.9);
        assert!(params.validate().is_ok());
        assert_relative_eq!(params.lambda(), MAX_STABLE_RELAXATION);
        assert_relative_eq!(params.mu(), 1.0 / (0.1 - 10.0), epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_relaxation() {
        let mut mesh = octahedron(1.0);
        for bad in [0.0, 1.0, -0.2, f64::NAN] {
            let err = smooth(&mut mesh, &SmoothParams::new(3, bad)).unwrap_err();
            assert!(matches!(err, MeshError::InvalidSmoothing { .. }));
        }
    }

    #[test]
    fn test_iteration_limit() {
        let mut mesh = octahedron(1.0);
        let at_limit = SmoothParams::new(MAX_SMOOTHING_ITERATIONS, 0.5);
        assert!(at_limit.validate().is_ok());

        let over = SmoothParams::new(MAX_SMOOTHING_ITERATIONS + 1, 0.5);
        let err = smooth(&mut mesh, &over).unwrap_err();
        assert!(matches!(err, MeshError::InvalidSmoothing { .. }));
        assert_eq!(mesh.vertex(0), DVec3::X);
    }

    #[test]
    fn test_empty_mesh_passes_through() {
        let mut mesh = Mesh::new();
        let result = smooth(&mut mesh, &SmoothParams::default()).unwrap();
        assert_eq!(result.iterations_performed, 0);
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_symmetric_mesh_keeps_symmetry() {
        // Every umbrella on a regular octahedron points at the centre, so
        // vertices only move radially and stay on a common sphere
        let mut mesh = octahedron(1.0);
        let result = smooth(&mut mesh, &SmoothParams::default()).unwrap();
        let r0 = mesh.vertex(0).length();
        for v in mesh.vertices() {
            assert_relative_eq!(v.length(), r0, epsilon = 1e-12);
        }
        assert_relative_eq!(result.max_displacement, (1.0 - r0).abs(), epsilon = 1e-12);
    }

    #[test]
    fn test_taubin_shrinks_less_than_laplacian() {
        let mut taubin = octahedron(1.0);
        smooth(&mut taubin, &SmoothParams::new(10, 0.1)).unwrap();

        // Plain Laplacian with the same lambda: mu = 0
        let mut plain = octahedron(1.0);
        let neighbors = plain.vertex_neighbors();
        let pinned = vec![false; plain.vertex_count()];
        let mut scratch = plain.vertices().to_vec();
        for _ in 0..10 {
            laplacian_step(plain.vertices_mut(), &mut scratch, &neighbors, &pinned, 0.1);
        }

        assert!(taubin.vertex(0).length() > plain.vertex(0).length());
    }

    #[test]
    fn test_topology_is_unchanged() {
        let mut mesh = octahedron(1.0);
        let triangles = mesh.triangles().to_vec();
        mesh.set_normals(vec![DVec3::X; 6]);
        smooth(&mut mesh, &SmoothParams::default()).unwrap();
        assert_eq!(mesh.triangles(), triangles.as_slice());
        assert_eq!(mesh.vertex_count(), 6);
        assert!(mesh.normals().is_none());
    }

    #[test]
    fn test_isolated_vertex_stays_put() {
        let mut mesh = octahedron(1.0);
        let lonely = mesh.add_vertex(DVec3::new(5.0, 5.0, 5.0));
        smooth(&mut mesh, &SmoothParams::default()).unwrap();
        assert_eq!(mesh.vertex(lonely), DVec3::new(5.0, 5.0, 5.0));
        assert!(mesh.vertices().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_preserve_boundary() {
        let mut mesh = Mesh::new();
        for p in [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::new(1.0, 1.0, 0.5)] {
            mesh.add_vertex(p);
        }
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(1, 3, 2);
        let before = mesh.vertices().to_vec();

        let params = SmoothParams::default().with_preserve_boundary(true);
        let result = smooth(&mut mesh, &params).unwrap();
        assert_eq!(mesh.vertices(), before.as_slice());
        assert_eq!(result.max_displacement, 0.0);
    }
}
