//! # Mesh Pipeline
//!
//! Linear driver: sample → extract → decimate → smooth → normals.

use std::time::{Duration, Instant};

use config::constants::DECIMATION_TOLERANCE_MULTIPLE;
use holobody_sdf::{compose, BodyPreset, ComposedField};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::MeshError;
use crate::grid::{sample, GridSpec};
use crate::marching_cubes::marching_cubes;
use crate::mesh::Mesh;
use crate::ops::{decimate, estimate_normals, smooth, DecimateParams, NormalReport, SmoothParams};

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// Sampling lattice.
    pub grid: GridSpec,
    /// Decimation settings; `None` skips the stage.
    pub decimate: Option<DecimateParams>,
    /// Smoothing settings.
    pub smooth: SmoothParams,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            grid: GridSpec::body_default(),
            decimate: Some(DecimateParams::body_default()),
            smooth: SmoothParams::default(),
        }
    }
}

impl PipelineParams {
    /// Checks every stage's settings before any work is done.
    pub fn validate(&self) -> Result<(), MeshError> {
        self.grid.validate()?;
        if let Some(decimate) = &self.decimate {
            decimate.validate()?;
        }
        self.smooth.validate()
    }
}

/// Wall-clock time spent per stage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageTimings {
    /// Field sampling.
    pub sample: Duration,
    /// Marching cubes.
    pub extract: Duration,
    /// Edge collapse. Zero when the stage is skipped.
    pub decimate: Duration,
    /// Taubin smoothing.
    pub smooth: Duration,
    /// Orientation repair and vertex normals.
    pub normals: Duration,
    /// Whole run.
    pub total: Duration,
}

/// Counters collected along the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineStats {
    /// Field evaluations performed by the sampler.
    pub sample_count: usize,
    /// Triangles straight out of marching cubes.
    pub extracted_triangles: usize,
    /// Triangles in the finished mesh.
    pub final_triangles: usize,
    /// Vertices in the finished mesh.
    pub final_vertices: usize,
    /// Triangle budget, if decimation ran.
    pub target_triangles: Option<usize>,
    /// Whether the final count is within the tolerated multiple of the
    /// budget. True when decimation was skipped.
    pub within_decimation_bound: bool,
    /// Largest vertex move made by smoothing.
    pub smoothing_displacement: f64,
    /// Orientation repairs made before computing normals.
    pub normals: NormalReport,
    /// Wall-clock time per stage.
    pub timings: StageTimings,
}

/// The finished mesh and how it was made.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Finished mesh with outward normals.
    pub mesh: Mesh,
    /// Counters and timings of the run.
    pub stats: PipelineStats,
}

/// Runs the full pipeline on a composed field.
///
/// Decimation only runs when the extracted surface exceeds the budget.
/// An empty iso-surface flows through every stage as an empty mesh.
///
/// # Errors
///
/// Returns a [`MeshError`] if any stage's parameters are invalid. No work
/// is done in that case.
pub fn run_pipeline(
    field: &ComposedField,
    params: &PipelineParams,
) -> Result<PipelineOutput, MeshError> {
    params.validate()?;
    let started = Instant::now();
    let mut timings = StageTimings::default();

    info!(
        parts = field.len(),
        resolution = ?params.grid.resolution,
        "Sampling distance field"
    );
    let clock = Instant::now();
    let grid = sample(field, &params.grid)?;
    timings.sample = clock.elapsed();
    let sample_count = grid.values().len();

    let clock = Instant::now();
    let mut mesh = marching_cubes(&grid);
    drop(grid);
    timings.extract = clock.elapsed();
    let extracted_triangles = mesh.triangle_count();
    info!(
        vertices = mesh.vertex_count(),
        triangles = extracted_triangles,
        "Extracted iso-surface"
    );

    let mut target_triangles = None;
    let mut within_decimation_bound = true;
    if let Some(decimate_params) = &params.decimate {
        let clock = Instant::now();
        let result = decimate(&mesh, decimate_params)?;
        timings.decimate = clock.elapsed();
        target_triangles = Some(result.target_triangles);
        within_decimation_bound = result.within_bound(DECIMATION_TOLERANCE_MULTIPLE);
        mesh = result.mesh;
        info!(triangles = mesh.triangle_count(), "Decimation finished");
    }

    let clock = Instant::now();
    let smoothing = smooth(&mut mesh, &params.smooth)?;
    timings.smooth = clock.elapsed();
    info!(
        iterations = smoothing.iterations_performed,
        max_displacement = smoothing.max_displacement,
        "Smoothing finished"
    );

    let clock = Instant::now();
    let normals = estimate_normals(&mut mesh);
    timings.normals = clock.elapsed();
    timings.total = started.elapsed();

    let stats = PipelineStats {
        sample_count,
        extracted_triangles,
        final_triangles: mesh.triangle_count(),
        final_vertices: mesh.vertex_count(),
        target_triangles,
        within_decimation_bound,
        smoothing_displacement: smoothing.max_displacement,
        normals,
        timings,
    };
    info!(
        vertices = stats.final_vertices,
        triangles = stats.final_triangles,
        elapsed = ?timings.total,
        "Mesh pipeline finished"
    );

    Ok(PipelineOutput { mesh, stats })
}

/// Validates and composes a body preset, then runs the pipeline on it.
///
/// # Errors
///
/// Returns [`MeshError::Sdf`] if the preset is invalid, or any error of
/// [`run_pipeline`].
pub fn run_preset(
    preset: &BodyPreset,
    params: &PipelineParams,
) -> Result<PipelineOutput, MeshError> {
    preset.validate()?;
    run_pipeline(&compose(preset), params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use holobody_sdf::{Primitive, SdfError};

    fn ball(radius: f64) -> ComposedField {
        ComposedField::new().with_part(
            "ball",
            Primitive::Sphere {
                center: DVec3::ZERO,
                radius,
            },
            0.05,
        )
    }

    fn small_params() -> PipelineParams {
        PipelineParams {
            grid: GridSpec::cube(-1.2, 1.2, 30).unwrap(),
            decimate: Some(DecimateParams::with_target_triangles(1_000)),
            smooth: SmoothParams::default(),
        }
    }

    #[test]
    fn test_default_params() {
        let params = PipelineParams::default();
        assert_eq!(params.grid, GridSpec::body_default());
        assert_eq!(
            params.decimate.as_ref().and_then(|d| d.target_triangles),
            Some(config::constants::DEFAULT_TARGET_TRIANGLES)
        );
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_sphere_pipeline() {
        let output = run_pipeline(&ball(0.9), &small_params()).unwrap();
        let stats = &output.stats;
        assert_eq!(stats.sample_count, 30 * 30 * 30);
        assert!(stats.extracted_triangles > 1_000);
        assert!(stats.final_triangles <= 1_000);
        assert_eq!(stats.target_triangles, Some(1_000));
        assert!(stats.within_decimation_bound);
        assert_eq!(stats.normals.flipped_components, 0);
        let timings = stats.timings;
        assert!(timings.total >= timings.sample + timings.extract + timings.decimate);

        let mesh = &output.mesh;
        assert!(mesh.validate());
        assert_eq!(mesh.normals().map(<[DVec3]>::len), Some(mesh.vertex_count()));
        for (v, n) in mesh.vertices().iter().zip(mesh.normals().unwrap()) {
            assert!(n.dot(*v) > 0.0);
        }
    }

    #[test]
    fn test_small_surface_skips_decimation() {
        let mut params = small_params();
        params.decimate = Some(DecimateParams::with_target_triangles(1_000_000));
        let output = run_pipeline(&ball(0.9), &params).unwrap();
        assert_eq!(output.stats.final_triangles, output.stats.extracted_triangles);
    }

    #[test]
    fn test_empty_field_flows_through() {
        let output = run_pipeline(&ComposedField::new(), &small_params()).unwrap();
        assert!(output.mesh.is_empty());
        assert_eq!(output.mesh.vertex_count(), 0);
        assert_eq!(output.stats.extracted_triangles, 0);
        assert_eq!(output.mesh.normals().map(<[DVec3]>::len), Some(0));
    }

    #[test]
    fn test_invalid_params_fail_fast() {
        let mut params = small_params();
        params.smooth.relaxation = 2.0;
        let err = run_pipeline(&ball(0.9), &params).unwrap_err();
        assert!(matches!(err, MeshError::InvalidSmoothing { .. }));

        let mut params = small_params();
        params.grid.resolution = [1, 30, 30];
        assert!(matches!(
            run_pipeline(&ball(0.9), &params),
            Err(MeshError::InvalidGrid { .. })
        ));
    }

    #[test]
    fn test_run_preset_rejects_invalid_preset() {
        let preset = BodyPreset::new("blank", Vec::new());
        let err = run_preset(&preset, &small_params()).unwrap_err();
        assert!(matches!(err, MeshError::Sdf(SdfError::EmptyPreset(_))));
    }
}
