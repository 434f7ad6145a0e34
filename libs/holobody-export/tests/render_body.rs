//! End-to-end rendering of the built-in body into an exchange record.

use holobody_export::{render_body, ExchangeRecord, GenerationConfig};
use holobody_mesh::GridSpec;

fn coarse_config() -> GenerationConfig {
    let body = GridSpec::body_default();
    GenerationConfig {
        grid: GridSpec::proportional(body.min, body.max, 80).unwrap(),
        target_triangles: 4_000,
        ..Default::default()
    }
}

#[test]
fn record_is_consistent() {
    let record = render_body(&coarse_config()).unwrap();
    assert_eq!(record.version, "v19_perfect_human");
    assert!(record.face_count > 0);
    assert_eq!(record.vertices.len(), record.vertex_count * 3);
    assert_eq!(record.indices.len(), record.face_count * 3);
    assert_eq!(record.normals.len(), record.vertices.len());
    assert!(record
        .indices
        .iter()
        .all(|&i| (i as usize) < record.vertex_count));
    assert!(record.validate().is_ok());
}

#[test]
fn normals_are_unit_or_zero() {
    let record = render_body(&coarse_config()).unwrap();
    for n in record.normals.chunks_exact(3) {
        let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!(length == 0.0 || (length - 1.0).abs() < 1e-3, "normal {n:?}");
    }
}

#[test]
fn body_spans_head_to_feet() {
    let record = render_body(&coarse_config()).unwrap();
    let ys: Vec<f64> = record.vertices.chunks_exact(3).map(|v| v[1]).collect();
    let top = ys.iter().copied().fold(f64::INFINITY, f64::min);
    let bottom = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!(top < -0.9, "head top at {top}");
    assert!(bottom > 0.9, "feet at {bottom}");
}

#[test]
fn rendering_is_idempotent() {
    let config = coarse_config();
    let a = render_body(&config).unwrap().to_json().unwrap();
    let b = render_body(&config).unwrap().to_json().unwrap();
    assert_eq!(a, b);
}

#[test]
fn record_survives_json() {
    let record = render_body(&coarse_config()).unwrap();
    let parsed = ExchangeRecord::from_json(&record.to_json().unwrap()).unwrap();
    assert_eq!(parsed.vertex_count, record.vertex_count);
    assert_eq!(parsed.indices, record.indices);
}
