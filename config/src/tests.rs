//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants
//! and helper functions.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_epsilon_is_small() {
    assert!(EPSILON < 1e-6, "EPSILON should be small for precision");
}

#[test]
fn test_capsule_guard_below_feature_size() {
    // The guard must not distort capsules whose axis is ~1 mm of body height
    assert!(CAPSULE_AXIS_EPSILON < 1e-3 * 1e-3 * 10.0);
}

// =============================================================================
// FIELD TESTS
// =============================================================================

#[test]
fn test_min_blend_radius_positive() {
    assert!(MIN_BLEND_RADIUS > 0.0);
    assert!(MIN_BLEND_RADIUS < DEFAULT_BLEND_RADIUS);
}

#[test]
fn test_empty_field_is_far_outside() {
    // Must dwarf every coordinate of the normalized body
    assert!(EMPTY_FIELD_DISTANCE > 100.0);
}

// =============================================================================
// GRID TESTS
// =============================================================================

#[test]
fn test_body_grid_extents_ordered() {
    for axis in 0..3 {
        assert!(BODY_GRID_MIN[axis] < BODY_GRID_MAX[axis]);
    }
}

#[test]
fn test_body_grid_resolution_matches_scaling() {
    let base = DEFAULT_GRID_RESOLUTION as f64;
    assert_eq!(BODY_GRID_RESOLUTION[0], DEFAULT_GRID_RESOLUTION);
    assert_eq!(BODY_GRID_RESOLUTION[1], (base * 2.1) as usize);
    assert_eq!(BODY_GRID_RESOLUTION[2], (base * 0.7) as usize);
}

#[test]
fn test_body_grid_within_node_limit() {
    let nodes: usize = BODY_GRID_RESOLUTION.iter().product();
    assert!(nodes < MAX_GRID_NODES);
}

#[test]
fn test_proportional_resolution_keeps_cell_size() {
    // 2.4 units at 41 nodes -> 40 cells; 1.2 units should get 20 cells
    assert_eq!(proportional_resolution(1.2, 2.4, 41), 21);
    assert_eq!(proportional_resolution(2.4, 2.4, 41), 41);
}

#[test]
fn test_proportional_resolution_clamps_to_minimum() {
    assert_eq!(proportional_resolution(1e-9, 2.0, 100), MIN_GRID_RESOLUTION);
    assert_eq!(proportional_resolution(1.0, 0.0, 100), MIN_GRID_RESOLUTION);
}

// =============================================================================
// POST-PROCESSING TESTS
// =============================================================================

#[test]
fn test_relaxation_defaults_in_range() {
    assert!(DEFAULT_RELAXATION_FACTOR > 0.0);
    assert!(DEFAULT_RELAXATION_FACTOR < MAX_STABLE_RELAXATION);
    assert!(MAX_STABLE_RELAXATION < 1.0);
    assert!(DEFAULT_SMOOTHING_ITERATIONS <= MAX_SMOOTHING_ITERATIONS);
}

#[test]
fn test_taubin_gain_stays_near_one_at_bound() {
    let per_pair = max_taubin_gain(MAX_STABLE_RELAXATION);
    assert!(per_pair > 1.0);
    let total = per_pair.powi(MAX_SMOOTHING_ITERATIONS as i32);
    assert!(total < 1.015, "total gain {total}");

    // Matches the peak of the sampled transfer function
    let lambda = MAX_STABLE_RELAXATION;
    let mu = 1.0 / (TAUBIN_PASS_BAND - 1.0 / lambda);
    let sampled = (0..=20_000)
        .map(|i| {
            let k = 2.0 * i as f64 / 20_000.0;
            ((1.0 - lambda * k) * (1.0 - mu * k)).abs()
        })
        .fold(0.0, f64::max);
    assert!((sampled - per_pair).abs() < 1e-9);
    assert!(sampled <= per_pair + 1e-12);
}

#[test]
fn test_taubin_inflation_outweighs_shrink() {
    let lambda = DEFAULT_RELAXATION_FACTOR;
    let mu = 1.0 / (TAUBIN_PASS_BAND - 1.0 / lambda);
    assert!(mu < 0.0);
    assert!(mu.abs() > lambda);
}

#[test]
fn test_decimation_multiple_above_one() {
    assert!(DECIMATION_TOLERANCE_MULTIPLE > 1.0);
}

// =============================================================================
// HELPER TESTS
// =============================================================================

#[test]
fn test_round_to_decimals() {
    assert_eq!(round_to_decimals(1.234567, VERTEX_DECIMALS), 1.23457);
    assert_eq!(round_to_decimals(0.99996, 4), 1.0);
    assert_eq!(round_to_decimals(-0.12344, NORMAL_DECIMALS), -0.1234);
}
