//! Quadric error metric.
//!
//! A quadric accumulates squared distances to a set of planes. Summing the
//! quadrics of two vertices gives the error of any merged position.

use std::ops::{Add, AddAssign};

use glam::{DMat3, DVec3};

/// Determinant below which the 3x3 system is treated as singular.
const SINGULAR_DETERMINANT: f64 = 1e-10;

/// Symmetric 4x4 error matrix, stored as its 3x3 block, the linear column
/// and the constant term.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Quadric {
    /// Upper triangle of the 3x3 block: xx, xy, xz, yy, yz, zz
    block: [f64; 6],
    /// Linear term `n * d`
    linear: DVec3,
    /// Constant term `d * d`
    constant: f64,
}

impl Quadric {
    /// Quadric of the plane `normal · p + offset = 0`.
    ///
    /// `normal` should be unit length so the error is a squared distance.
    pub(crate) fn from_plane(normal: DVec3, offset: f64) -> Self {
        let n = normal;
        Self {
            block: [n.x * n.x, n.x * n.y, n.x * n.z, n.y * n.y, n.y * n.z, n.z * n.z],
            linear: n * offset,
            constant: offset * offset,
        }
    }

    /// Quadric of the plane through triangle `(a, b, c)`, or `None` if the
    /// triangle is degenerate.
    pub(crate) fn from_triangle(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let normal = (b - a).cross(c - a).try_normalize()?;
        Some(Self::from_plane(normal, -normal.dot(a)))
    }

    fn matrix(&self) -> DMat3 {
        let [xx, xy, xz, yy, yz, zz] = self.block;
        DMat3::from_cols(
            DVec3::new(xx, xy, xz),
            DVec3::new(xy, yy, yz),
            DVec3::new(xz, yz, zz),
        )
    }

    /// Sum of squared plane distances at `p`.
    pub(crate) fn evaluate(&self, p: DVec3) -> f64 {
        p.dot(self.matrix() * p) + 2.0 * self.linear.dot(p) + self.constant
    }

    /// Position minimizing the error, or `None` if the system is singular.
    pub(crate) fn optimal_point(&self) -> Option<DVec3> {
        let m = self.matrix();
        if m.determinant().abs() < SINGULAR_DETERMINANT {
            return None;
        }
        let p = m.inverse() * -self.linear;
        p.is_finite().then_some(p)
    }
}

impl AddAssign for Quadric {
    fn add_assign(&mut self, other: Self) {
        for (a, b) in self.block.iter_mut().zip(other.block) {
            *a += b;
        }
        self.linear += other.linear;
        self.constant += other.constant;
    }
}

impl Add for Quadric {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}
