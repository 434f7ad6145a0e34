//! Tests for quadric edge collapse.

use super::*;
use std::f64::consts::PI;

/// Latitude/longitude sphere: two poles plus `rings` rings of `segments`
/// vertices, `2 * segments * rings` triangles.
fn uv_sphere(segments: usize, rings: usize) -> Mesh {
    let mut mesh = Mesh::new();
    mesh.add_vertex(DVec3::Y);
    for r in 1..=rings {
        let phi = PI * r as f64 / (rings + 1) as f64;
        for s in 0..segments {
            let theta = 2.0 * PI * s as f64 / segments as f64;
            mesh.add_vertex(DVec3::new(
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            ));
        }
    }
    let south = mesh.add_vertex(DVec3::NEG_Y);
    let ring = |r: usize, s: usize| (1 + (r - 1) * segments + s % segments) as u32;

    let mut triangles = Vec::new();
    for s in 0..segments {
        triangles.push([0, ring(1, s), ring(1, s + 1)]);
        triangles.push([south, ring(rings, s + 1), ring(rings, s)]);
    }
    for r in 1..rings {
        for s in 0..segments {
            triangles.push([ring(r, s), ring(r + 1, s), ring(r + 1, s + 1)]);
            triangles.push([ring(r, s), ring(r + 1, s + 1), ring(r, s + 1)]);
        }
    }
    for [a, b, c] in triangles {
        let (pa, pb, pc) = (mesh.vertex(a), mesh.vertex(b), mesh.vertex(c));
        if (pb - pa).cross(pc - pa).dot(pa + pb + pc) < 0.0 {
            mesh.add_triangle(a, c, b);
        } else {
            mesh.add_triangle(a, b, c);
        }
    }
    mesh
}

/// Flat `n x n` quad grid over the unit square, split into triangles.
fn flat_patch(n: u32) -> Mesh {
    let mut mesh = Mesh::new();
    for j in 0..=n {
        for i in 0..=n {
            mesh.add_vertex(DVec3::new(i as f64 / n as f64, j as f64 / n as f64, 0.0));
        }
    }
    let id = |i: u32, j: u32| i + (n + 1) * j;
    for j in 0..n {
        for i in 0..n {
            mesh.add_triangle(id(i, j), id(i + 1, j), id(i + 1, j + 1));
            mesh.add_triangle(id(i, j), id(i + 1, j + 1), id(i, j + 1));
        }
    }
    mesh
}

#[test]
fn test_uv_sphere_fixture() {
    let sphere = uv_sphere(100, 100);
    assert_eq!(sphere.triangle_count(), 20_000);
    assert!(sphere.is_closed());
    assert_eq!(sphere.euler_characteristic(), 2);
}

#[test]
fn test_empty_mesh_passes_through() {
    let result = decimate(&Mesh::new(), &DecimateParams::default()).unwrap();
    assert_eq!(result.original_triangles, 0);
    assert_eq!(result.final_triangles, 0);
    assert_eq!(result.collapses_performed, 0);
    assert!(result.mesh.is_empty());
}

#[test]
fn test_mesh_within_budget_is_unchanged() {
    let sphere = uv_sphere(12, 6);
    let result = decimate(&sphere, &DecimateParams::with_target_triangles(1000)).unwrap();
    assert_eq!(result.mesh, sphere);
    assert_eq!(result.collapses_performed, 0);
    assert!(result.reached_target());
}

#[test]
fn test_decimate_sphere_to_target_band() {
    let sphere = uv_sphere(100, 100);
    let result = decimate(&sphere, &DecimateParams::with_target_triangles(5_000)).unwrap();

    assert_eq!(result.original_triangles, 20_000);
    assert_eq!(result.target_triangles, 5_000);
    assert!(
        (3_000..=7_000).contains(&result.final_triangles),
        "{result}"
    );
    assert_eq!(result.final_triangles, result.mesh.triangle_count());

    let mesh = &result.mesh;
    assert!(mesh.validate());
    for i in 0..mesh.triangle_count() {
        assert!(!mesh.is_degenerate(i), "face {i} has zero area");
    }
    assert!(mesh.is_closed());
    assert_eq!(mesh.euler_characteristic(), 2);
    for v in mesh.vertices() {
        assert!((v.length() - 1.0).abs() < 0.05);
    }
}

#[test]
fn test_decimate_keeps_outward_winding() {
    let sphere = uv_sphere(40, 40);
    let result = decimate(&sphere, &DecimateParams::with_target_ratio(0.2)).unwrap();
    let mesh = &result.mesh;
    for i in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(i);
        let centroid = mesh.vertex(a) + mesh.vertex(b) + mesh.vertex(c);
        assert!(mesh.face_cross(i).dot(centroid) > 0.0);
    }
}

#[test]
fn test_preserve_boundary_keeps_rim() {
    let patch = flat_patch(20);
    let rim: Vec<DVec3> = patch
        .vertices()
        .iter()
        .copied()
        .filter(|p| p.x == 0.0 || p.x == 1.0 || p.y == 0.0 || p.y == 1.0)
        .collect();
    assert_eq!(rim.len(), 80);

    let result = decimate(&patch, &DecimateParams::with_target_ratio(0.25)).unwrap();
    assert!(result.final_triangles < patch.triangle_count());
    assert!(result.collapses_performed > 0);
    for p in &rim {
        assert!(result.mesh.vertices().contains(p), "rim vertex {p} moved");
    }
    assert_eq!(result.mesh.boundary_edge_count(), 80);
}

#[test]
fn test_max_error_stops_early() {
    let sphere = uv_sphere(100, 100);
    let params = DecimateParams::with_target_triangles(5_000).with_max_error(1e-9);
    let result = decimate(&sphere, &params).unwrap();
    assert!(!result.reached_target());
    assert!(result.final_triangles > 10_000);
}

#[test]
fn test_invalid_params_are_rejected() {
    let mut params = DecimateParams::default();
    params.target_ratio = 2.0;
    let err = decimate(&uv_sphere(8, 4), &params).unwrap_err();
    assert!(matches!(err, MeshError::InvalidDecimation { .. }));
}

#[test]
fn test_decimation_is_deterministic() {
    let sphere = uv_sphere(30, 30);
    let params = DecimateParams::with_target_ratio(0.3);
    let a = decimate(&sphere, &params).unwrap();
    let b = decimate(&sphere, &params).unwrap();
    assert_eq!(a.mesh, b.mesh);
    assert_eq!(a.collapses_performed, b.collapses_performed);
}

#[test]
fn test_candidate_order_is_min_first() {
    let make = |cost: f64, keep: u32| Candidate {
        cost,
        keep,
        remove: keep + 1,
        stamps: (0, 0),
        position: DVec3::ZERO,
    };
    let mut heap = BinaryHeap::new();
    heap.push(make(0.5, 0));
    heap.push(make(0.1, 4));
    heap.push(make(0.1, 2));
    heap.push(make(0.9, 6));
    let order: Vec<u32> = std::iter::from_fn(|| heap.pop()).map(|c| c.keep).collect();
    assert_eq!(order, vec![2, 4, 0, 6]);
}
