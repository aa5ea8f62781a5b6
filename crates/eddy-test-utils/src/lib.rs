//! Test utilities for Eddy development.
//!
//! Provides grid builders, analytic reference fields in [`fixtures`], and
//! float assertions with readable failure messages.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{linear_sink, linear_source, rigid_vortex, uniform};

use eddy_core::{Vec2, VectorGrid};

/// Build a `width x height` grid by evaluating `f(x, y)` for every cell.
///
/// Panics on zero dimensions; test inputs are expected to be valid.
pub fn grid_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> Vec2) -> VectorGrid {
    let mut grid = VectorGrid::new(width, height).expect("test grid dimensions must be non-zero");
    for y in 0..height {
        for x in 0..width {
            grid.set(x, y, f(x, y));
        }
    }
    grid
}

/// Assert two scalars agree within `tol`.
#[track_caller]
pub fn assert_close(actual: f32, expected: f32, tol: f32) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected} ± {tol}, got {actual}"
    );
}

/// Assert two vectors agree component-wise within `tol`.
#[track_caller]
pub fn assert_vec2_close(actual: Vec2, expected: Vec2, tol: f32) {
    assert!(
        (actual.x - expected.x).abs() <= tol && (actual.y - expected.y).abs() <= tol,
        "expected {expected} ± {tol}, got {actual}"
    );
}

/// Sum of all vector components, handy for conservation checks.
pub fn component_sum(grid: &VectorGrid) -> Vec2 {
    grid.cells().fold(Vec2::ZERO, |acc, (_, _, v)| acc + v)
}
