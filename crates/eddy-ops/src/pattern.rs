//! Analytic radial and tangential flow patterns.
//!
//! Both patterns share a linear falloff: a cell at distance `d` from the
//! center, with `0 < d < radius`, is overwritten with a vector of length
//! `magnitude * (1 - d / radius)`. Radial vectors point straight away from
//! the center (`atan2(dy, dx)`); tangential vectors are rotated by +90°,
//! giving a counter-clockwise vortex in `(x right, y down)` grid space.
//!
//! The write is a partial overwrite: the center cell and everything at or
//! beyond `radius` keep their previous values, so patterns can be layered.

use eddy_core::{GridError, Vec2, VectorGrid};
use std::f64::consts::FRAC_PI_2;

/// Which analytic pattern to write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Divergent field pointing away from the center.
    Radial,
    /// Rotational field perpendicular to the radius.
    Tangential,
}

impl PatternKind {
    fn angle_offset(self) -> f64 {
        match self {
            Self::Radial => 0.0,
            Self::Tangential => FRAC_PI_2,
        }
    }
}

/// Default pattern center: the middle cell, by integer division.
pub fn default_center(grid: &VectorGrid) -> (f64, f64) {
    ((grid.width() / 2) as f64, (grid.height() / 2) as f64)
}

/// Default pattern radius: a quarter of the shorter side, by integer division.
pub fn default_radius(grid: &VectorGrid) -> f64 {
    (grid.width().min(grid.height()) / 4) as f64
}

fn check_finite(name: &'static str, v: f64) -> Result<(), GridError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(GridError::InvalidParameter {
            name,
            reason: format!("must be finite, got {v}"),
        })
    }
}

/// Write `kind` into `grid`. Returns the number of cells overwritten.
///
/// `center` defaults to [`default_center`], `radius` to [`default_radius`].
/// A non-positive radius writes nothing.
///
/// # Errors
///
/// [`GridError::InvalidParameter`] if `magnitude`, the center, or the
/// radius is NaN or infinite. Nothing is written in that case.
pub fn apply_pattern(
    grid: &mut VectorGrid,
    kind: PatternKind,
    center: Option<(f64, f64)>,
    radius: Option<f64>,
    magnitude: f64,
) -> Result<usize, GridError> {
    let (cx, cy) = center.unwrap_or_else(|| default_center(grid));
    let radius = radius.unwrap_or_else(|| default_radius(grid));
    check_finite("center.x", cx)?;
    check_finite("center.y", cy)?;
    check_finite("radius", radius)?;
    check_finite("magnitude", magnitude)?;

    let offset = kind.angle_offset();
    let mut written = 0;
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if !(dist > 0.0 && dist < radius) {
                continue;
            }
            let angle = dy.atan2(dx) + offset;
            let len = magnitude * (1.0 - dist / radius);
            grid.set(
                x,
                y,
                Vec2::new((len * angle.cos()) as f32, (len * angle.sin()) as f32),
            );
            written += 1;
        }
    }
    Ok(written)
}

/// Write a divergent (source-like) pattern. See [`apply_pattern`].
///
/// # Examples
///
/// ```
/// use eddy_core::VectorGrid;
/// use eddy_ops::create_radial_pattern;
///
/// let mut grid = VectorGrid::new(64, 64).unwrap();
/// create_radial_pattern(&mut grid, Some((32.0, 32.0)), Some(16.0), 1.0).unwrap();
///
/// // Distance 8 on the +x axis: length 1 - 8/16, pointing right.
/// let v = grid.get(40, 32).unwrap();
/// assert!((v.x - 0.5).abs() < 1e-6 && v.y.abs() < 1e-6);
/// ```
pub fn create_radial_pattern(
    grid: &mut VectorGrid,
    center: Option<(f64, f64)>,
    radius: Option<f64>,
    magnitude: f64,
) -> Result<usize, GridError> {
    apply_pattern(grid, PatternKind::Radial, center, radius, magnitude)
}

/// Write a rotational (vortex) pattern. See [`apply_pattern`].
pub fn create_tangential_pattern(
    grid: &mut VectorGrid,
    center: Option<(f64, f64)>,
    radius: Option<f64>,
    magnitude: f64,
) -> Result<usize, GridError> {
    apply_pattern(grid, PatternKind::Tangential, center, radius, magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eddy_test_utils::{assert_close, assert_vec2_close, uniform};

    #[test]
    fn tangential_at_distance_eight() {
        let mut g = VectorGrid::new(64, 64).unwrap();
        create_tangential_pattern(&mut g, Some((32.0, 32.0)), Some(16.0), 1.0).unwrap();
        assert_vec2_close(g.sample(40, 32), Vec2::new(0.0, 0.5), 1e-6);
        // Opposite side rotates the other way.
        assert_vec2_close(g.sample(24, 32), Vec2::new(0.0, -0.5), 1e-6);
    }

    #[test]
    fn radial_points_away_with_linear_falloff() {
        let mut g = VectorGrid::new(64, 64).unwrap();
        create_radial_pattern(&mut g, Some((32.0, 32.0)), Some(16.0), 2.0).unwrap();
        assert_vec2_close(g.sample(32, 28), Vec2::new(0.0, -1.5), 1e-6);
        let diag = g.sample(35, 36);
        // distance 5, length 2 * (1 - 5/16)
        assert_close(diag.length(), 2.0 * (1.0 - 5.0 / 16.0), 1e-5);
        assert_close(diag.x / diag.y, 3.0 / 4.0, 1e-5);
    }

    #[test]
    fn center_and_outside_cells_untouched() {
        let marker = Vec2::new(9.0, -9.0);
        let mut g = uniform(32, 32, marker);
        let written =
            create_radial_pattern(&mut g, Some((16.0, 16.0)), Some(4.0), 1.0).unwrap();
        assert_eq!(g.sample(16, 16), marker);
        assert_eq!(g.sample(20, 16), marker); // exactly at radius
        assert_eq!(g.sample(0, 0), marker);
        // Cells with 0 < d < 4 on an integer lattice around an integer center.
        let expected = (12..=20)
            .flat_map(|y| (12..=20).map(move |x| (x, y)))
            .filter(|&(x, y): &(i32, i32)| {
                let d2 = (x - 16).pow(2) + (y - 16).pow(2);
                d2 > 0 && d2 < 16
            })
            .count();
        assert_eq!(written, expected);
    }

    #[test]
    fn defaults_use_grid_center_and_quarter_radius() {
        let mut g = VectorGrid::new(20, 12).unwrap();
        assert_eq!(default_center(&g), (10.0, 6.0));
        assert_eq!(default_radius(&g), 3.0);
        create_radial_pattern(&mut g, None, None, 1.0).unwrap();
        assert_vec2_close(g.sample(12, 6), Vec2::new(1.0 / 3.0, 0.0), 1e-6);
        assert_eq!(g.sample(13, 6), Vec2::ZERO);
    }

    #[test]
    fn tiny_grid_default_radius_writes_nothing() {
        let mut g = VectorGrid::new(3, 3).unwrap();
        let n = create_tangential_pattern(&mut g, None, None, 1.0).unwrap();
        assert_eq!(n, 0);
        assert!(g.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn off_grid_center_still_writes_inside() {
        let mut g = VectorGrid::new(8, 8).unwrap();
        let n = create_radial_pattern(&mut g, Some((-2.0, 3.5)), Some(5.0), 1.0).unwrap();
        assert!(n > 0);
        let v = g.sample(1, 3);
        assert!(v.x > 0.0, "should point away from the off-grid center");
    }

    #[test]
    fn non_finite_arguments_rejected_without_writing() {
        let mut g = VectorGrid::new(8, 8).unwrap();
        assert!(matches!(
            create_radial_pattern(&mut g, None, None, f64::NAN),
            Err(GridError::InvalidParameter {
                name: "magnitude",
                ..
            })
        ));
        assert!(create_radial_pattern(&mut g, Some((f64::INFINITY, 0.0)), None, 1.0).is_err());
        assert!(create_tangential_pattern(&mut g, None, Some(f64::NAN), 1.0).is_err());
        assert!(g.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn radial_and_tangential_are_perpendicular() {
        let mut r = VectorGrid::new(32, 32).unwrap();
        let mut t = VectorGrid::new(32, 32).unwrap();
        create_radial_pattern(&mut r, Some((16.0, 16.0)), Some(10.0), 1.0).unwrap();
        create_tangential_pattern(&mut t, Some((16.0, 16.0)), Some(10.0), 1.0).unwrap();
        for ((_, _, a), (_, _, b)) in r.cells().zip(t.cells()) {
            assert!((a.x * b.x + a.y * b.y).abs() < 1e-6);
            assert_close(a.length(), b.length(), 1e-6);
        }
    }
}
