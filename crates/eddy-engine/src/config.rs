//! Session configuration, validation, and error types.
//!
//! [`SessionConfig`] is the input for [`FieldSession::new`](crate::FieldSession::new).
//! [`validate()`](SessionConfig::validate) checks every invariant up front
//! so a constructed session never fails a frame on bad configuration.

use std::error::Error;
use std::fmt;

use eddy_core::{ConfigError, GridError, StencilConfig, VectorGrid};
use eddy_markers::TrackerParams;

// ── SessionConfigError ─────────────────────────────────────────────

/// Errors detected during [`SessionConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum SessionConfigError {
    /// Grid dimensions are unusable.
    Grid(GridError),
    /// Stencil weights are unusable.
    Stencil(ConfigError),
    /// Tracker parameters are unusable.
    InvalidTracker {
        /// Description of the violated constraint.
        reason: String,
    },
    /// Edge inflow magnitude is NaN or infinite.
    InvalidInflow {
        /// The invalid value.
        value: f32,
    },
}

impl fmt::Display for SessionConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Stencil(e) => write!(f, "stencil: {e}"),
            Self::InvalidTracker { reason } => write!(f, "invalid tracker params: {reason}"),
            Self::InvalidInflow { value } => {
                write!(f, "edge_inflow must be finite, got {value}")
            }
        }
    }
}

impl Error for SessionConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Stencil(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for SessionConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<ConfigError> for SessionConfigError {
    fn from(e: ConfigError) -> Self {
        Self::Stencil(e)
    }
}

// ── SessionConfig ──────────────────────────────────────────────────

/// Everything needed to build a [`FieldSession`](crate::FieldSession).
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Grid columns. Default: 64.
    pub width: u32,
    /// Grid rows. Default: 64.
    pub height: u32,
    /// Initial stencil configuration, later tunable through the live handle.
    pub stencil: StencilConfig,
    /// Marker update parameters.
    pub tracker: TrackerParams,
    /// Run the update phases each frame. Default: true.
    pub enable_update: bool,
    /// Zero the grid at the start of every frame. Default: false.
    pub clear_each_frame: bool,
    /// Inward edge forcing added each updating frame. Default: `None`.
    pub edge_inflow: Option<f32>,
    /// Run the whole-grid stencil pass each updating frame. Default: true.
    pub stencil_each_frame: bool,
    /// Seed for marker scattering.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            stencil: StencilConfig::default(),
            tracker: TrackerParams::default(),
            enable_update: true,
            clear_each_frame: false,
            edge_inflow: None,
            stencil_each_frame: true,
            seed: 0,
        }
    }
}

impl SessionConfig {
    /// Frame layout of the interactive demo: the grid is rebuilt from
    /// scratch every frame as inward edge forcing of 0.5 plus marker
    /// feedback, with no stencil pass.
    pub fn edge_driven(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clear_each_frame: true,
            edge_inflow: Some(0.5),
            stencil_each_frame: false,
            ..Self::default()
        }
    }

    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), SessionConfigError> {
        // 1. Grid dimensions.
        VectorGrid::check_dimensions(self.width, self.height)?;
        // 2. Stencil weights.
        self.stencil.validate()?;
        // 3. Tracker scalars.
        self.tracker
            .validate()
            .map_err(|reason| SessionConfigError::InvalidTracker { reason })?;
        // 4. Edge inflow.
        if let Some(value) = self.edge_inflow {
            if !value.is_finite() {
                return Err(SessionConfigError::InvalidInflow { value });
            }
        }
        Ok(())
    }
}
