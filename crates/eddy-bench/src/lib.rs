//! Benchmark profiles and fixtures for the Eddy workspace.
//!
//! - [`reference_grid`]: 128x128 grid with a vortex and a sink side by side
//! - [`stress_grid`]: 512x512 grid with the same layout
//! - [`reference_session`]: session over a 100x100 grid with scattered markers

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use eddy_core::{GridError, StencilConfig, VectorGrid};
use eddy_engine::{FieldSession, SessionConfig, SessionConfigError};
use eddy_ops::{create_radial_pattern, create_tangential_pattern};

/// A `width x height` grid with a vortex in the left half and a sink in
/// the right half, each with radius `height / 3`.
pub fn vortex_and_sink(width: u32, height: u32) -> Result<VectorGrid, GridError> {
    let mut grid = VectorGrid::new(width, height)?;
    let r = (height / 3) as f64;
    let cy = (height / 2) as f64;
    create_tangential_pattern(&mut grid, Some((width as f64 * 0.25, cy)), Some(r), 1.0)?;
    create_radial_pattern(&mut grid, Some((width as f64 * 0.75, cy)), Some(r), -1.0)?;
    Ok(grid)
}

/// 128x128 (16K cells) benchmark grid.
pub fn reference_grid() -> Result<VectorGrid, GridError> {
    vortex_and_sink(128, 128)
}

/// 512x512 (~262K cells) benchmark grid.
pub fn stress_grid() -> Result<VectorGrid, GridError> {
    vortex_and_sink(512, 512)
}

/// A 100x100 session seeded with the vortex/sink layout and
/// `markers` scattered markers. The stencil normalizes, so the field stays
/// bounded over long runs.
pub fn reference_session(seed: u64, markers: usize) -> Result<FieldSession, SessionConfigError> {
    let mut session = FieldSession::new(SessionConfig {
        width: 100,
        height: 100,
        stencil: StencilConfig::builder().enable_normalization(true).build()?,
        seed,
        ..SessionConfig::default()
    })?;
    let grid = vortex_and_sink(100, 100)?;
    session.grid_mut().as_mut_slice().copy_from_slice(grid.as_slice());
    session.scatter_markers(markers);
    Ok(session)
}
