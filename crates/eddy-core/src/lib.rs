//! Core types for the Eddy vector-field workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! grid store every other crate mutates, the [`Vec2`] cell type, the typed
//! stencil configuration, and the error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod grid;
pub mod vec2;

pub use config::{AverageMode, ConfigValue, StencilConfig, StencilConfigBuilder};
pub use error::{ConfigError, GridError};
pub use grid::{create_grid, VectorGrid, NEIGHBOUR_OFFSETS};
pub use vec2::Vec2;
