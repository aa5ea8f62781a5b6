//! Weighted 4-connected adjacent-sum stencil.
//!
//! Two entry points share one per-cell kernel:
//!
//! - [`sum_adjacent_vectors`] evaluates a single cell and reports the
//!   result without touching the grid.
//! - [`update_grid_with_adjacent_sum`] applies the kernel to every cell
//!   Jacobi-style (all reads come from the pre-update field) and writes
//!   the result back in place.
//!
//! ```text
//! sum = [self_weight * v(x,y)]           if include_self and in bounds
//!     + neighbor_weight * v(x, y-1)      for each in-bounds neighbour,
//!     + neighbor_weight * v(x, y+1)      in this order
//!     + neighbor_weight * v(x-1, y)
//!     + neighbor_weight * v(x+1, y)
//! ```
//!
//! Because both paths run the same kernel in the same order, interior
//! cells agree bit-for-bit when averaging and normalization are off.

use eddy_core::{AverageMode, StencilConfig, Vec2, VectorGrid};

/// Floor applied to the normalization divisor.
pub const MIN_WEIGHT_SUM: f32 = 0.1;

/// Result of the shared per-cell kernel.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CellSum {
    sum: Vec2,
    terms: u32,
}

fn weighted_sum(
    grid: &VectorGrid,
    x: i64,
    y: i64,
    include_self: bool,
    cfg: &StencilConfig,
) -> CellSum {
    let mut sum = Vec2::ZERO;
    let mut terms = 0u32;

    if include_self && grid.contains(x, y) {
        sum += grid.sample(x, y) * cfg.self_weight;
        terms += 1;
    }

    for (nx, ny) in grid.neighbours(x, y) {
        sum += grid.sample(nx as i64, ny as i64) * cfg.neighbor_weight;
        terms += 1;
    }

    CellSum { sum, terms }
}

/// Weighted sum of the cell at `(x, y)` and its in-bounds 4-neighbours.
///
/// `include_self = None` uses [`StencilConfig::include_self`]. The self
/// term is only added when `(x, y)` itself is in the grid; neighbours
/// outside the grid contribute nothing. With `enable_average` set, the
/// sum is divided by the number of terms actually added.
///
/// Coordinates may lie outside the grid: a point just past an edge still
/// picks up its in-bounds neighbour.
///
/// # Examples
///
/// ```
/// use eddy_core::{StencilConfig, Vec2, VectorGrid};
/// use eddy_ops::sum_adjacent_vectors;
///
/// let grid = VectorGrid::filled(3, 3, Vec2::new(1.0, 0.0)).unwrap();
/// let cfg = StencilConfig::default();
///
/// // 1.0 * self + 0.1 * 4 neighbours
/// let s = sum_adjacent_vectors(&grid, 1, 1, Some(true), &cfg);
/// assert!((s.x - 1.4).abs() < 1e-6);
/// ```
pub fn sum_adjacent_vectors(
    grid: &VectorGrid,
    x: i64,
    y: i64,
    include_self: Option<bool>,
    cfg: &StencilConfig,
) -> Vec2 {
    let include_self = cfg.resolve_include_self(include_self);
    let CellSum { sum, terms } = weighted_sum(grid, x, y, include_self, cfg);
    if cfg.enable_average && terms > 0 {
        sum / terms as f32
    } else {
        sum
    }
}

/// Analytic term count for a cell: 4 neighbours minus one per touched
/// edge, plus one for the cell itself.
fn analytic_count(grid: &VectorGrid, x: u32, y: u32, include_self: bool) -> u32 {
    4 - grid.touched_edges(x, y) + u32::from(include_self)
}

/// Analytic weight sum for a cell, floored at [`MIN_WEIGHT_SUM`].
fn analytic_weight_sum(
    grid: &VectorGrid,
    x: u32,
    y: u32,
    include_self: bool,
    cfg: &StencilConfig,
) -> f32 {
    let mut w = 4.0 * cfg.neighbor_weight;
    for _ in 0..grid.touched_edges(x, y) {
        w -= cfg.neighbor_weight;
    }
    if include_self {
        w += cfg.self_weight;
    }
    w.max(MIN_WEIGHT_SUM)
}

/// Replace every cell with its weighted adjacent sum, in place.
///
/// All reads come from a copy of the field taken before the pass, so the
/// update order does not matter. Cells outside the grid read as zero.
///
/// Post-processing, chosen from the configuration:
///
/// - `enable_average`: the per-cell count `4 - touched_edges + include_self`
///   is derived. Under [`AverageMode::Reference`] it is not applied; under
///   [`AverageMode::Divide`] each cell is divided by it.
/// - otherwise `enable_normalization`: each cell is divided by
///   `4*nw - nw*touched_edges + (sw if include_self)`, floored at
///   [`MIN_WEIGHT_SUM`].
///
/// Returns the grid for chaining.
pub fn update_grid_with_adjacent_sum<'g>(
    grid: &'g mut VectorGrid,
    include_self: Option<bool>,
    cfg: &StencilConfig,
) -> &'g mut VectorGrid {
    let include_self = cfg.resolve_include_self(include_self);
    let prev = grid.clone();

    for y in 0..prev.height() {
        for x in 0..prev.width() {
            let CellSum { sum, .. } = weighted_sum(&prev, x as i64, y as i64, include_self, cfg);

            let out = if cfg.enable_average {
                let count = analytic_count(&prev, x, y, include_self);
                match cfg.average_mode {
                    AverageMode::Reference => sum,
                    AverageMode::Divide if count > 0 => sum / count as f32,
                    AverageMode::Divide => sum,
                }
            } else if cfg.enable_normalization {
                sum / analytic_weight_sum(&prev, x, y, include_self, cfg)
            } else {
                sum
            };

            grid.set(x, y, out);
        }
    }

    grid
}
