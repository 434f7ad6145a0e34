//! Result types for decimation operations.

use crate::mesh::Mesh;

/// Result of mesh decimation.
#[derive(Debug, Clone)]
pub struct DecimationResult {
    /// The decimated mesh.
    pub mesh: Mesh,

    /// Number of triangles in original mesh.
    pub original_triangles: usize,

    /// Number of triangles in decimated mesh.
    pub final_triangles: usize,

    /// Triangle budget the run aimed for.
    pub target_triangles: usize,

    /// Number of edge collapses performed.
    pub collapses_performed: usize,

    /// Number of edge collapses rejected (non-manifold, flipped or degenerate result).
    pub collapses_rejected: usize,
}

impl DecimationResult {
    /// Final over original triangle count (1.0 for an empty mesh).
    #[must_use]
    pub fn achieved_ratio(&self) -> f64 {
        if self.original_triangles == 0 {
            1.0
        } else {
            self.final_triangles as f64 / self.original_triangles as f64
        }
    }

    /// Returns true if the final count is at most `multiple` times the target.
    #[must_use]
    pub fn within_bound(&self, multiple: f64) -> bool {
        self.final_triangles as f64 <= self.target_triangles as f64 * multiple
    }

    /// Returns true if the target was reached.
    #[must_use]
    pub fn reached_target(&self) -> bool {
        self.final_triangles <= self.target_triangles
    }
}

impl std::fmt::Display for DecimationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Decimation: {} -> {} triangles (target {}, ratio {:.3}, {} collapses)",
            self.original_triangles,
            self.final_triangles,
            self.target_triangles,
            self.achieved_ratio(),
            self.collapses_performed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(original: usize, final_triangles: usize, target: usize) -> DecimationResult {
        DecimationResult {
            mesh: Mesh::new(),
            original_triangles: original,
            final_triangles,
            target_triangles: target,
            collapses_performed: (original - final_triangles) / 2,
            collapses_rejected: 0,
        }
    }

    #[test]
    fn test_achieved_ratio() {
        assert!((result(1000, 250, 250).achieved_ratio() - 0.25).abs() < 1e-12);
        assert_eq!(result(0, 0, 10).achieved_ratio(), 1.0);
    }

    #[test]
    fn test_within_bound() {
        let r = result(20_000, 6_500, 5_000);
        assert!(!r.reached_target());
        assert!(r.within_bound(1.4));
        assert!(!r.within_bound(1.2));
    }

    #[test]
    fn test_display() {
        let display = result(1000, 500, 500).to_string();
        assert!(display.contains("1000 -> 500"));
        assert!(display.contains("0.500"));
    }
}
