//! Frame driver for Eddy vector-field sessions.
//!
//! [`FieldSession`] is the composition root: it owns the [`VectorGrid`],
//! the [`MarkerTracker`], a [`LiveConfig`] handle, and a seeded generator,
//! and advances everything one frame per [`step()`](FieldSession::step).
//! Nothing here is global; create as many sessions as needed.
//!
//! [`VectorGrid`]: eddy_core::VectorGrid
//! [`MarkerTracker`]: eddy_markers::MarkerTracker

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod live;
pub mod metrics;
pub mod session;

pub use config::{SessionConfig, SessionConfigError};
pub use live::LiveConfig;
pub use metrics::FrameMetrics;
pub use session::{FieldSession, FrameReport};
