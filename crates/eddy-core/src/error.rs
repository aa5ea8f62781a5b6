//! Error types for grid construction and operator input validation.
//!
//! Every variant here belongs to the "invalid input" class: it is raised
//! before any cell is written, so a failed call never leaves a grid
//! partially mutated. Out-of-range sampling coordinates are *not* errors
//! (they read as the zero vector) and have no variant.

use std::error::Error;
use std::fmt;

/// Errors from [`VectorGrid`](crate::VectorGrid) construction and from
/// operators that validate their numeric arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// Attempted to construct a grid with zero width or height.
    EmptyGrid {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A dimension does not fit the signed coordinate range.
    DimensionTooLarge {
        /// Which dimension (`"width"` or `"height"`).
        name: &'static str,
        /// The requested value.
        value: u32,
        /// The largest accepted value.
        max: u32,
    },
    /// A buffer handed to the grid has the wrong number of components.
    ShapeMismatch {
        /// Components required (`width * height * 2`).
        expected: usize,
        /// Components supplied.
        actual: usize,
    },
    /// A numeric argument is NaN, infinite, or outside its domain.
    InvalidParameter {
        /// Argument name.
        name: &'static str,
        /// Description of the accepted domain.
        reason: String,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { width, height } => {
                write!(f, "grid must have at least one cell, got {width}x{height}")
            }
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "{name} {value} exceeds maximum of {max}")
            }
            Self::ShapeMismatch { expected, actual } => {
                write!(
                    f,
                    "grid buffer has {actual} components, expected {expected} (2 per cell)"
                )
            }
            Self::InvalidParameter { name, reason } => {
                write!(f, "invalid {name}: {reason}")
            }
        }
    }
}

impl Error for GridError {}

/// Errors from building or tuning a [`StencilConfig`](crate::StencilConfig).
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A weight is NaN or infinite.
    NonFiniteWeight {
        /// Which weight.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// A named key is not one of the recognised configuration keys.
    UnknownKey {
        /// The key as supplied by the caller.
        key: String,
    },
    /// A named key was given a value of the wrong type.
    TypeMismatch {
        /// The key as supplied by the caller.
        key: String,
        /// The type the key expects.
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteWeight { name, value } => {
                write!(f, "{name} must be finite, got {value}")
            }
            Self::UnknownKey { key } => write!(f, "unknown configuration key '{key}'"),
            Self::TypeMismatch { key, expected } => {
                write!(f, "configuration key '{key}' expects a {expected} value")
            }
        }
    }
}

impl Error for ConfigError {}
