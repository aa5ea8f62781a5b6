//! Local field writes used to couple markers back into the grid.
//!
//! Coordinates are rounded half-to-even before indexing, so `2.5` lands on
//! column 2 and `3.5` on column 4.

use eddy_core::{Vec2, VectorGrid};

/// Round to the nearest integer, ties to even.
pub(crate) fn round_cell(v: f32) -> i64 {
    v.round_ties_even() as i64
}

/// Add a `+`-shaped outward patch at the rounded `(x, y)`.
///
/// Each in-bounds orthogonal neighbour `(dx, dy)` receives
/// `(dx * mag, dy * mag)`, visited with `dy` outer and `dx` inner, both
/// running `-1..=1`. The center cell then receives `(vx * mag, vy * mag)`.
/// The position is clamped into the grid first, so the center write always
/// lands. Non-finite coordinates write nothing.
///
/// Returns the number of cells written.
pub fn create_tiny_vector(grid: &mut VectorGrid, x: f32, y: f32, mag: f32, vx: f32, vy: f32) -> usize {
    if !x.is_finite() || !y.is_finite() {
        return 0;
    }
    let x = x.clamp(0.0, (grid.width() - 1) as f32);
    let y = y.clamp(0.0, (grid.height() - 1) as f32);
    let cx = round_cell(x);
    let cy = round_cell(y);

    let mut written = 0;
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dx.abs() + dy.abs() != 1 {
                continue;
            }
            let push = Vec2::new(dx as f32 * mag, dy as f32 * mag);
            if grid.add(cx + dx, cy + dy, push) {
                written += 1;
            }
        }
    }
    if grid.add(cx, cy, Vec2::new(vx * mag, vy * mag)) {
        written += 1;
    }
    written
}

/// Add `(vx, vy)` with linear falloff around the rounded `(x, y)`.
///
/// Covers the integer box `[-ceil(r), ceil(r)]` on each axis. A cell at
/// distance `d` from the rounded center receives `(vx, vy) * (1 - d / r)`;
/// cells with `d >= r` and cells outside the grid receive nothing.
/// A non-positive or non-finite radius, or a non-finite position, is a
/// no-op.
///
/// Returns the number of cells written.
pub fn add_vector_at_position(
    grid: &mut VectorGrid,
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    radius: f32,
) -> usize {
    if !radius.is_finite() || radius <= 0.0 || !x.is_finite() || !y.is_finite() {
        return 0;
    }
    let cx = round_cell(x);
    let cy = round_cell(y);
    let reach = radius.ceil() as i64;
    let v = Vec2::new(vx, vy);

    // Only the part of the box inside the grid is visited.
    let sx = cx.saturating_sub(reach).max(0);
    let ex = cx.saturating_add(reach).min(grid.width() as i64 - 1);
    let sy = cy.saturating_sub(reach).max(0);
    let ey = cy.saturating_add(reach).min(grid.height() as i64 - 1);

    let mut written = 0;
    for gy in sy..=ey {
        for gx in sx..=ex {
            let ox = gx as f64 - cx as f64;
            let oy = gy as f64 - cy as f64;
            let d = (ox * ox + oy * oy).sqrt() as f32;
            let factor = 1.0 - d / radius;
            if factor <= 0.0 {
                continue;
            }
            if grid.add(gx, gy, v * factor) {
                written += 1;
            }
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use eddy_test_utils::{assert_close, assert_vec2_close, component_sum};

    #[test]
    fn tiny_vector_is_a_plus_shape() {
        let mut g = VectorGrid::new(8, 8).unwrap();
        let n = create_tiny_vector(&mut g, 4.0, 4.0, 2.0, 0.0, 0.0);
        assert_eq!(n, 5);
        assert_eq!(g.sample(4, 3), Vec2::new(0.0, -2.0));
        assert_eq!(g.sample(4, 5), Vec2::new(0.0, 2.0));
        assert_eq!(g.sample(3, 4), Vec2::new(-2.0, 0.0));
        assert_eq!(g.sample(5, 4), Vec2::new(2.0, 0.0));
        assert_eq!(g.sample(4, 4), Vec2::ZERO);
        assert_eq!(g.sample(5, 5), Vec2::ZERO);
        assert_eq!(component_sum(&g), Vec2::ZERO);
    }

    #[test]
    fn tiny_vector_center_term_scales_by_mag() {
        let mut g = VectorGrid::new(5, 5).unwrap();
        create_tiny_vector(&mut g, 2.2, 1.8, 0.5, 1.0, -4.0);
        assert_eq!(g.sample(2, 2), Vec2::new(0.5, -2.0));
    }

    #[test]
    fn tiny_vector_rounds_half_to_even() {
        let mut g = VectorGrid::new(8, 8).unwrap();
        create_tiny_vector(&mut g, 2.5, 3.5, 1.0, 1.0, 0.0);
        // (2.5, 3.5) -> (2, 4)
        assert_eq!(g.sample(2, 4), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn tiny_vector_clamps_to_grid() {
        let mut g = VectorGrid::new(4, 4).unwrap();
        let n = create_tiny_vector(&mut g, -10.0, 99.0, 1.0, 0.0, 1.0);
        // Clamped to (0, 3): only up and right neighbours exist.
        assert_eq!(n, 3);
        assert_eq!(g.sample(0, 3), Vec2::new(0.0, 1.0));
        assert_eq!(g.sample(0, 2), Vec2::new(0.0, -1.0));
        assert_eq!(g.sample(1, 3), Vec2::new(1.0, 0.0));
        assert_eq!(create_tiny_vector(&mut g, f32::NAN, 0.0, 1.0, 0.0, 0.0), 0);
    }

    #[test]
    fn add_vector_falls_off_linearly() {
        let mut g = VectorGrid::new(16, 16).unwrap();
        add_vector_at_position(&mut g, 8.0, 8.0, 1.0, 0.0, 4.0);
        assert_vec2_close(g.sample(8, 8), Vec2::new(1.0, 0.0), 1e-6);
        assert_vec2_close(g.sample(10, 8), Vec2::new(0.5, 0.0), 1e-6);
        assert_close(g.sample(11, 9).x, 1.0 - 10f32.sqrt() / 4.0, 1e-6);
        // Exactly at the radius and beyond: untouched.
        assert_eq!(g.sample(12, 8), Vec2::ZERO);
        assert_eq!(g.sample(11, 11), Vec2::ZERO);
    }

    #[test]
    fn add_vector_never_writes_past_radius() {
        let mut g = VectorGrid::new(20, 20).unwrap();
        add_vector_at_position(&mut g, 9.6, 10.2, 0.0, -1.0, 2.5);
        for (x, y, v) in g.cells() {
            let d = ((x as f32 - 10.0).powi(2) + (y as f32 - 10.0).powi(2)).sqrt();
            if d >= 2.5 {
                assert_eq!(v, Vec2::ZERO, "cell ({x},{y}) at distance {d}");
            } else {
                assert!(v.y < 0.0);
            }
        }
    }

    #[test]
    fn add_vector_degenerate_radius_is_noop() {
        let mut g = VectorGrid::new(4, 4).unwrap();
        assert_eq!(add_vector_at_position(&mut g, 1.0, 1.0, 1.0, 1.0, 0.0), 0);
        assert_eq!(add_vector_at_position(&mut g, 1.0, 1.0, 1.0, 1.0, -2.0), 0);
        assert_eq!(add_vector_at_position(&mut g, 1.0, 1.0, 1.0, 1.0, f32::NAN), 0);
        assert!(g.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn add_vector_handles_huge_positions_and_radii() {
        let mut g = VectorGrid::new(8, 8).unwrap();
        assert_eq!(add_vector_at_position(&mut g, 1e20, 1.0, 1.0, 0.0, 2.0), 0);
        assert_eq!(add_vector_at_position(&mut g, -1e20, -1e20, 1.0, 0.0, 2.0), 0);
        assert!(g.as_slice().iter().all(|&v| v == 0.0));

        // A radius covering the whole grid touches every cell once.
        let n = add_vector_at_position(&mut g, 3.0, 3.0, 1.0, 0.0, 1e30);
        assert_eq!(n, 64);
        assert!(g.cells().all(|(_, _, v)| v.x > 0.0 && v.x <= 1.0));
    }

    #[test]
    fn add_vector_near_edge_clips() {
        let mut g = VectorGrid::new(4, 4).unwrap();
        let n = add_vector_at_position(&mut g, 0.0, 0.0, 1.0, 1.0, 1.5);
        // Offsets with d < 1.5 inside the grid: (0,0) (1,0) (0,1) (1,1).
        assert_eq!(n, 4);
    }
}
