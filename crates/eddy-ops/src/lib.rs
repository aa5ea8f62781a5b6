//! Whole-grid and per-cell operators for Eddy vector grids.
//!
//! Everything here is a free function over a borrowed [`VectorGrid`]
//! (or a small validated operator struct), so callers own the grid and
//! decide when each operator runs.
//!
//! # Frame order in the demo driver
//!
//! 1. [`add_inward_edge_vectors`] forces the border.
//! 2. [`update_grid_with_adjacent_sum`] smooths the field.
//! 3. Marker feedback writes (in `eddy-markers`).
//! 4. [`find_vector_centers`] reads the result on demand.
//!
//! [`VectorGrid`]: eddy_core::VectorGrid

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod divergence;
pub mod inflow;
pub mod pattern;
pub mod stats;
pub mod stencil;

pub use divergence::{
    divergence, find_vector_centers, CenterDetector, CenterDetectorBuilder, CenterKind,
    DivergenceBoundary, ScanOrder, VectorCenter,
};
pub use inflow::add_inward_edge_vectors;
pub use pattern::{
    apply_pattern, create_radial_pattern, create_tangential_pattern, default_center,
    default_radius, PatternKind,
};
pub use stats::{grid_stats, GridStats};
pub use stencil::{sum_adjacent_vectors, update_grid_with_adjacent_sum, MIN_WEIGHT_SUM};
