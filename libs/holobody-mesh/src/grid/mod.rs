//! # Volumetric Sampling
//!
//! Dense axis-aligned lattices and the parallel sampler that fills them
//! from a distance field.
//!
//! ## Layout
//!
//! Nodes are stored x-fastest: `index = ix + nx * (iy + ny * iz)`. Node
//! coordinates form an inclusive linspace per axis, so the first and last
//! nodes sit exactly on the grid bounds.
//!
//! ## Parallelism
//!
//! Each z slab (`nx * ny` nodes) is an independent `rayon` task writing
//! into its own disjoint chunk of the output. Every node is evaluated once,
//! so the result is bit-identical to a sequential sweep.


use config::constants::{
    proportional_resolution, BODY_GRID_MAX, BODY_GRID_MIN, BODY_GRID_RESOLUTION, MAX_GRID_NODES,
    MIN_GRID_RESOLUTION,
};
use glam::DVec3;
use holobody_sdf::DistanceField;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MeshError;

/// Bounds and per-axis node counts of a sampling lattice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Lower corner.
    pub min: DVec3,
    /// Upper corner.
    pub max: DVec3,
    /// Node counts along x, y and z.
    pub resolution: [usize; 3],
}

impl GridSpec {
    /// Creates a validated grid.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidGrid`] if any axis has fewer than
    /// [`MIN_GRID_RESOLUTION`] nodes, if bounds are not finite or not
    /// strictly increasing, or if the node count exceeds [`MAX_GRID_NODES`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use holobody_mesh::GridSpec;
    /// use glam::DVec3;
    ///
    /// let grid = GridSpec::new(DVec3::splat(-1.0), DVec3::splat(1.0), [21, 21, 21]).unwrap();
    /// assert_eq!(grid.node_count(), 21 * 21 * 21);
    /// assert!(GridSpec::new(DVec3::ZERO, DVec3::ONE, [1, 4, 4]).is_err());
    /// ```
    pub fn new(min: DVec3, max: DVec3, resolution: [usize; 3]) -> Result<Self, MeshError> {
        let spec = Self {
            min,
            max,
            resolution,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// A cube `[lo, hi]^3` with `n` nodes per axis.
    pub fn cube(lo: f64, hi: f64, n: usize) -> Result<Self, MeshError> {
        Self::new(DVec3::splat(lo), DVec3::splat(hi), [n; 3])
    }

    /// The reference lattice for the built-in body preset.
    pub fn body_default() -> Self {
        Self {
            min: DVec3::from_array(BODY_GRID_MIN),
            max: DVec3::from_array(BODY_GRID_MAX),
            resolution: BODY_GRID_RESOLUTION,
        }
    }

    /// A grid whose longest axis has `dominant` nodes and whose other axes
    /// are scaled to give roughly cubic cells.
    ///
    /// # Example
    ///
    /// ```rust
    /// use holobody_mesh::GridSpec;
    /// use glam::DVec3;
    ///
    /// let grid = GridSpec::proportional(DVec3::ZERO, DVec3::new(2.0, 1.0, 0.5), 41).unwrap();
    /// assert_eq!(grid.resolution, [41, 21, 11]);
    /// ```
    pub fn proportional(min: DVec3, max: DVec3, dominant: usize) -> Result<Self, MeshError> {
        let extent = max - min;
        let longest = extent.max_element();
        let resolution = [
            proportional_resolution(extent.x, longest, dominant),
            proportional_resolution(extent.y, longest, dominant),
            proportional_resolution(extent.z, longest, dominant),
        ];
        Self::new(min, max, resolution)
    }

    /// Checks bounds and resolution.
    pub fn validate(&self) -> Result<(), MeshError> {
        const AXES: [char; 3] = ['x', 'y', 'z'];
        for axis in 0..3 {
            let (lo, hi, n) = (self.min[axis], self.max[axis], self.resolution[axis]);
            if n < MIN_GRID_RESOLUTION {
                return Err(MeshError::invalid_grid(format!(
                    "resolution {n} along {} (minimum {MIN_GRID_RESOLUTION})",
                    AXES[axis]
                )));
            }
            if !(lo.is_finite() && hi.is_finite()) {
                return Err(MeshError::invalid_grid(format!(
                    "non-finite bounds along {}",
                    AXES[axis]
                )));
            }
            if lo >= hi {
                return Err(MeshError::invalid_grid(format!(
                    "min {lo} is not below max {hi} along {}",
                    AXES[axis]
                )));
            }
        }
        let nodes = self
            .resolution
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n));
        match nodes {
            Some(n) if n <= MAX_GRID_NODES => Ok(()),
            _ => Err(MeshError::invalid_grid(format!(
                "{:?} nodes exceed the limit of {MAX_GRID_NODES}",
                self.resolution
            ))),
        }
    }

    /// Total number of lattice nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.resolution.iter().product()
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.resolution.iter().map(|n| n.saturating_sub(1)).product()
    }

    /// Distance between neighbouring nodes along each axis.
    pub fn spacing(&self) -> DVec3 {
        let [nx, ny, nz] = self.resolution;
        (self.max - self.min) / DVec3::new((nx - 1) as f64, (ny - 1) as f64, (nz - 1) as f64)
    }

    /// Linear index of node `(ix, iy, iz)`.
    #[inline]
    pub fn index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        let [nx, ny, _] = self.resolution;
        ix + nx * (iy + ny * iz)
    }

    /// Coordinate of node `i` along `axis` (0 = x, 1 = y, 2 = z).
    ///
    /// Exact at both ends of the axis.
    #[inline]
    pub fn coordinate(&self, axis: usize, i: usize) -> f64 {
        let t = i as f64 / (self.resolution[axis] - 1) as f64;
        self.min[axis] * (1.0 - t) + self.max[axis] * t
    }

    /// Position of node `(ix, iy, iz)`.
    #[inline]
    pub fn position(&self, ix: usize, iy: usize, iz: usize) -> DVec3 {
        DVec3::new(
            self.coordinate(0, ix),
            self.coordinate(1, iy),
            self.coordinate(2, iz),
        )
    }

    /// All node coordinates along `axis`.
    pub fn axis_coordinates(&self, axis: usize) -> Vec<f64> {
        (0..self.resolution[axis])
            .map(|i| self.coordinate(axis, i))
            .collect()
    }

    /// Returns true if the box `[min, max]` lies inside the grid bounds.
    pub fn encloses(&self, min: DVec3, max: DVec3) -> bool {
        self.min.cmple(min).all() && max.cmple(self.max).all()
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::body_default()
    }
}

/// Field values on every node of a [`GridSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    spec: GridSpec,
    values: Vec<f64>,
}

impl SampleGrid {
    /// Wraps precomputed values.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidGrid`] if the spec is invalid or the
    /// value count does not match the node count.
    pub fn from_values(spec: GridSpec, values: Vec<f64>) -> Result<Self, MeshError> {
        spec.validate()?;
        if values.len() != spec.node_count() {
            return Err(MeshError::invalid_grid(format!(
                "{} values for {} nodes",
                values.len(),
                spec.node_count()
            )));
        }
        Ok(Self { spec, values })
    }

    /// The lattice the values were sampled on.
    #[inline]
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Values in x-fastest order.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at node `(ix, iy, iz)`.
    #[inline]
    pub fn get(&self, ix: usize, iy: usize, iz: usize) -> f64 {
        self.values[self.spec.index(ix, iy, iz)]
    }

    /// Number of nodes strictly below `iso`.
    pub fn count_below(&self, iso: f64) -> usize {
        self.values.iter().filter(|&&v| v < iso).count()
    }
}

/// Samples `field` on every node of `spec`.
///
/// # Errors
///
/// Returns [`MeshError::InvalidGrid`] if `spec` fails
/// [`GridSpec::validate`].
///
/// # Example
///
/// ```rust
/// use holobody_mesh::{grid::sample, GridSpec};
/// use holobody_sdf::Primitive;
/// use glam::DVec3;
///
/// let ball = Primitive::Sphere { center: DVec3::ZERO, radius: 0.5 };
/// let spec = GridSpec::cube(-1.0, 1.0, 3).unwrap();
/// let grid = sample(&ball, &spec).unwrap();
/// assert_eq!(grid.get(1, 1, 1), -0.5);
/// ```
pub fn sample<F>(field: &F, spec: &GridSpec) -> Result<SampleGrid, MeshError>
where
    F: DistanceField + ?Sized,
{
    spec.validate()?;
    let [nx, ny, _] = spec.resolution;
    let xs = spec.axis_coordinates(0);
    let ys = spec.axis_coordinates(1);
    let zs = spec.axis_coordinates(2);

    let mut values = vec![0.0; spec.node_count()];
    values
        .par_chunks_mut(nx * ny)
        .zip(zs.par_iter())
        .for_each(|(slab, &z)| {
            for (iy, &y) in ys.iter().enumerate() {
                let row = &mut slab[iy * nx..(iy + 1) * nx];
                for (cell, &x) in row.iter_mut().zip(&xs) {
                    *cell = field.distance(DVec3::new(x, y, z));
                }
            }
        });

    debug!(
        nodes = values.len(),
        resolution = ?spec.resolution,
        "Sampled distance field"
    );

    Ok(SampleGrid {
        spec: *spec,
        values,
    })
}
