//! Eddy: a dense 2D vector field with local stencil updates, analytic flow
//! patterns, source/sink detection, and marker particles that drift through
//! the field and push back on it.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Eddy sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use eddy::prelude::*;
//!
//! let mut grid = create_grid(64, 64, Vec2::ZERO).unwrap();
//! create_radial_pattern(&mut grid, Some((32.0, 32.0)), Some(16.0), 1.0).unwrap();
//!
//! let centers = find_vector_centers(&grid, 0.1, 5.0);
//! assert!(centers.iter().all(|c| c.kind == CenterKind::Source));
//!
//! let mut markers = MarkerTracker::new();
//! markers.add_marker(32.0, 32.0, 1.0);
//! markers.update(&mut grid, &TrackerParams::default());
//! assert_eq!(markers.len(), 1);
//!
//! let cfg = StencilConfig::default();
//! update_grid_with_adjacent_sum(&mut grid, None, &cfg);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `eddy-core` | `Vec2`, `VectorGrid`, stencil configuration, errors |
//! | [`ops`] | `eddy-ops` | Stencil, patterns, divergence, edge inflow, statistics |
//! | [`markers`] | `eddy-markers` | Marker tracker and feedback writes |
//! | [`engine`] | `eddy-engine` | `FieldSession` frame driver and live configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grid storage, vectors, configuration, and errors (`eddy-core`).
pub use eddy_core as types;

/// Whole-grid and per-cell operators (`eddy-ops`).
///
/// Includes [`ops::update_grid_with_adjacent_sum`],
/// [`ops::create_radial_pattern`], and [`ops::find_vector_centers`].
pub use eddy_ops as ops;

/// Marker particles (`eddy-markers`).
pub use eddy_markers as markers;

/// Frame driver (`eddy-engine`).
///
/// [`engine::FieldSession`] owns a grid and a tracker and steps them
/// together; [`engine::LiveConfig`] tunes the stencil from another thread.
pub use eddy_engine as engine;

/// Common imports for typical Eddy usage.
///
/// ```rust
/// use eddy::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use eddy_core::{
        create_grid, AverageMode, ConfigValue, StencilConfig, Vec2, VectorGrid,
    };

    // Errors
    pub use eddy_core::{ConfigError, GridError};
    pub use eddy_markers::MarkerError;

    // Operators
    pub use eddy_ops::{
        add_inward_edge_vectors, create_radial_pattern, create_tangential_pattern,
        find_vector_centers, grid_stats, sum_adjacent_vectors, update_grid_with_adjacent_sum,
        CenterDetector, CenterKind, DivergenceBoundary, PatternKind, VectorCenter,
    };

    // Markers
    pub use eddy_markers::{
        add_vector_at_position, create_tiny_vector, Marker, MarkerId, MarkerTracker,
        TrackerParams,
    };

    // Engine
    pub use eddy_engine::{FieldSession, FrameMetrics, FrameReport, LiveConfig, SessionConfig};
}
