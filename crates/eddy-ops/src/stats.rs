//! Summary statistics over vector magnitudes.

use eddy_core::VectorGrid;
use std::fmt;

/// Magnitude statistics for one grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridStats {
    /// Grid width.
    pub width: u32,
    /// Grid height.
    pub height: u32,
    /// Number of cells.
    pub cell_count: usize,
    /// Smallest vector length.
    pub min_magnitude: f32,
    /// Largest vector length.
    pub max_magnitude: f32,
    /// Mean vector length.
    pub mean_magnitude: f32,
    /// Cells whose vector is exactly zero.
    pub zero_count: usize,
}

/// Compute [`GridStats`] in one pass. The mean is accumulated in `f64`.
pub fn grid_stats(grid: &VectorGrid) -> GridStats {
    let mut min = f32::INFINITY;
    let mut max = 0.0f32;
    let mut sum = 0.0f64;
    let mut zeros = 0;

    for (_, _, v) in grid.cells() {
        let m = v.length();
        min = min.min(m);
        max = max.max(m);
        sum += m as f64;
        if m == 0.0 {
            zeros += 1;
        }
    }

    let n = grid.cell_count();
    GridStats {
        width: grid.width(),
        height: grid.height(),
        cell_count: n,
        min_magnitude: min,
        max_magnitude: max,
        mean_magnitude: (sum / n as f64) as f32,
        zero_count: zeros,
    }
}

impl fmt::Display for GridStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} grid, {} cells, |v| min {:.3} max {:.3} mean {:.3}, {} zero",
            self.width,
            self.height,
            self.cell_count,
            self.min_magnitude,
            self.max_magnitude,
            self.mean_magnitude,
            self.zero_count
        )
    }
}
