//! Analytic reference fields.
//!
//! Each builder returns a fully populated grid whose divergence and curl
//! are known in closed form, so operator tests can check against exact
//! values instead of recorded output.
//!
//! - [`linear_source`]: `v = (x - cx, y - cy)`, divergence 2 everywhere.
//! - [`linear_sink`]: the negation, divergence -2.
//! - [`rigid_vortex`]: `v = (-(y - cy), x - cx)`, divergence 0.
//! - [`uniform`]: constant vector.

use crate::grid_from_fn;
use eddy_core::{Vec2, VectorGrid};

/// `v = (x - cx, y - cy)`: divergence 2, pointing away from `(cx, cy)`.
pub fn linear_source(width: u32, height: u32, cx: f32, cy: f32) -> VectorGrid {
    grid_from_fn(width, height, |x, y| Vec2::new(x as f32 - cx, y as f32 - cy))
}

/// `v = (cx - x, cy - y)`: divergence -2, pointing at `(cx, cy)`.
pub fn linear_sink(width: u32, height: u32, cx: f32, cy: f32) -> VectorGrid {
    grid_from_fn(width, height, |x, y| Vec2::new(cx - x as f32, cy - y as f32))
}

/// Rigid rotation `v = (-(y - cy), x - cx)` about `(cx, cy)`, divergence 0.
pub fn rigid_vortex(width: u32, height: u32, cx: f32, cy: f32) -> VectorGrid {
    grid_from_fn(width, height, |x, y| {
        Vec2::new(-(y as f32 - cy), x as f32 - cx)
    })
}

/// Every cell holds `v`.
pub fn uniform(width: u32, height: u32, v: Vec2) -> VectorGrid {
    VectorGrid::filled(width, height, v).expect("test grid dimensions must be non-zero")
}
