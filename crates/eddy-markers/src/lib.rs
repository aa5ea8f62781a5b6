//! Marker particles that drift through an Eddy vector grid.
//!
//! A [`MarkerTracker`] owns a list of floating-point positions. Each
//! [`update`](MarkerTracker::update) samples the field around every
//! marker, moves it by the magnitude-weighted mean vector, prunes markers
//! sitting in a dead field, and writes a small outward patch back into the
//! grid at the new position ([`create_tiny_vector`]). The patch feeds the
//! next stencil pass, so motion and field shape evolve together.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod feedback;
pub mod tracker;

pub use error::MarkerError;
pub use feedback::{add_vector_at_position, create_tiny_vector};
pub use tracker::{
    FailurePolicy, Marker, MarkerId, MarkerOutcome, MarkerTracker, TrackerParams, UpdateReport,
};
