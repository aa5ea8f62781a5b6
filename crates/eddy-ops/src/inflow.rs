//! Inward boundary forcing.

use eddy_core::{Vec2, VectorGrid};

/// Add `magnitude` along the inward normal of every border cell.
///
/// The top row gains `+y`, the bottom row `-y`, the left column `+x` and the
/// right column `-x`. Corners receive both components. On a grid one cell
/// wide (or tall) the opposing contributions cancel.
///
/// Returns the number of cell writes performed.
pub fn add_inward_edge_vectors(grid: &mut VectorGrid, magnitude: f32) -> usize {
    let w = grid.width();
    let h = grid.height();
    let mut writes = 0;

    for x in 0..w {
        grid.add(x as i64, 0, Vec2::new(0.0, magnitude));
        grid.add(x as i64, (h - 1) as i64, Vec2::new(0.0, -magnitude));
        writes += 2;
    }
    for y in 0..h {
        grid.add(0, y as i64, Vec2::new(magnitude, 0.0));
        grid.add((w - 1) as i64, y as i64, Vec2::new(-magnitude, 0.0));
        writes += 2;
    }

    writes
}
