//! Per-marker failure reporting.

use std::error::Error;
use std::fmt;

/// Why a single marker could not be updated.
///
/// These never abort an update pass; they are collected into the
/// [`UpdateReport`](crate::UpdateReport) and the marker is kept or dropped
/// according to [`FailurePolicy`](crate::FailurePolicy).
#[derive(Clone, Debug, PartialEq)]
pub enum MarkerError {
    /// The marker's position (stored or computed) is NaN or infinite.
    NonFinitePosition {
        /// Offending x.
        x: f32,
        /// Offending y.
        y: f32,
    },
    /// The sampled window contained NaN or infinite vectors.
    NonFiniteSample {
        /// Column the window was centered on.
        cx: i64,
        /// Row the window was centered on.
        cy: i64,
    },
}

impl fmt::Display for MarkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinitePosition { x, y } => {
                write!(f, "marker position ({x}, {y}) is not finite")
            }
            Self::NonFiniteSample { cx, cy } => {
                write!(f, "non-finite field values around ({cx}, {cy})")
            }
        }
    }
}

impl Error for MarkerError {}
