//! Typed stencil configuration.
//!
//! [`StencilConfig`] replaces a string-keyed option bag. It is `Copy`, so
//! an operator call receives one immutable snapshot and cannot observe a
//! value changing halfway through a grid pass. Collaborators that still
//! speak in named keys go through [`StencilConfig::set_named`], which
//! validates the key and value type before touching the snapshot.

use crate::error::ConfigError;

/// How the whole-grid stencil pass treats `enable_average`.
///
/// The per-cell sum always divides by the number of contributing terms
/// when averaging is on. The whole-grid pass historically computed the
/// per-cell count but never applied it; both behaviours are kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AverageMode {
    /// Count is computed but the result is left undivided.
    #[default]
    Reference,
    /// Divide each cell by its analytic term count, matching the
    /// per-cell sum.
    Divide,
}

/// A value supplied for a named configuration key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigValue {
    /// Numeric value (weights).
    Float(f64),
    /// Boolean value (feature switches).
    Bool(bool),
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Weights and switches for the adjacent-sum stencil.
///
/// # Examples
///
/// ```
/// use eddy_core::{AverageMode, StencilConfig};
///
/// let cfg = StencilConfig::builder()
///     .neighbor_weight(0.25)
///     .enable_normalization(true)
///     .build()
///     .unwrap();
/// assert_eq!(cfg.self_weight, 1.0);
/// assert_eq!(cfg.neighbor_weight, 0.25);
/// assert_eq!(cfg.average_mode, AverageMode::Reference);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StencilConfig {
    /// Weight of the cell's own vector. Default: 1.0.
    pub self_weight: f32,
    /// Weight of each 4-connected neighbour. Default: 0.1.
    pub neighbor_weight: f32,
    /// Average the weighted sum over contributing terms. Default: false.
    pub enable_average: bool,
    /// Divide by the analytic weight sum (ignored when averaging). Default: false.
    pub enable_normalization: bool,
    /// Include the cell itself when the caller does not say. Default: true.
    pub include_self: bool,
    /// Whole-grid treatment of `enable_average`. Default: [`AverageMode::Reference`].
    pub average_mode: AverageMode,
}

impl Default for StencilConfig {
    fn default() -> Self {
        Self {
            self_weight: 1.0,
            neighbor_weight: 0.1,
            enable_average: false,
            enable_normalization: false,
            include_self: true,
            average_mode: AverageMode::Reference,
        }
    }
}

impl StencilConfig {
    /// Key for [`self_weight`](Self::self_weight).
    pub const KEY_SELF_WEIGHT: &'static str = "vector_self_weight";
    /// Key for [`neighbor_weight`](Self::neighbor_weight).
    pub const KEY_NEIGHBOR_WEIGHT: &'static str = "vector_neighbor_weight";
    /// Key for [`enable_average`](Self::enable_average).
    pub const KEY_ENABLE_AVERAGE: &'static str = "enable_vector_average";
    /// Key for [`enable_normalization`](Self::enable_normalization).
    pub const KEY_ENABLE_NORMALIZATION: &'static str = "enable_vector_normalization";
    /// Key for [`include_self`](Self::include_self).
    pub const KEY_INCLUDE_SELF: &'static str = "include_self";

    /// Start a builder from the defaults.
    pub fn builder() -> StencilConfigBuilder {
        StencilConfigBuilder {
            config: Self::default(),
        }
    }

    /// Check that both weights are finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.self_weight.is_finite() {
            return Err(ConfigError::NonFiniteWeight {
                name: "self_weight",
                value: self.self_weight,
            });
        }
        if !self.neighbor_weight.is_finite() {
            return Err(ConfigError::NonFiniteWeight {
                name: "neighbor_weight",
                value: self.neighbor_weight,
            });
        }
        Ok(())
    }

    /// Apply one named value. Keys accept an optional `vector_field.`
    /// prefix. On error the configuration is unchanged.
    pub fn set_named(&mut self, key: &str, value: ConfigValue) -> Result<(), ConfigError> {
        let name = key.strip_prefix("vector_field.").unwrap_or(key);
        let mut next = *self;
        match name {
            Self::KEY_SELF_WEIGHT => next.self_weight = expect_float(key, value)?,
            Self::KEY_NEIGHBOR_WEIGHT => next.neighbor_weight = expect_float(key, value)?,
            Self::KEY_ENABLE_AVERAGE => next.enable_average = expect_bool(key, value)?,
            Self::KEY_ENABLE_NORMALIZATION => {
                next.enable_normalization = expect_bool(key, value)?
            }
            Self::KEY_INCLUDE_SELF => next.include_self = expect_bool(key, value)?,
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                })
            }
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Apply a batch of named values, stopping at the first error.
    ///
    /// Entries before the failing one stay applied.
    pub fn apply_named<'a, I>(&mut self, entries: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (&'a str, ConfigValue)>,
    {
        for (key, value) in entries {
            self.set_named(key, value)?;
        }
        Ok(())
    }

    /// Resolve a per-call `include_self` override against the configured default.
    pub fn resolve_include_self(&self, include_self: Option<bool>) -> bool {
        include_self.unwrap_or(self.include_self)
    }
}

fn expect_float(key: &str, value: ConfigValue) -> Result<f32, ConfigError> {
    match value {
        ConfigValue::Float(v) => Ok(v as f32),
        ConfigValue::Bool(_) => Err(ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: "float",
        }),
    }
}

fn expect_bool(key: &str, value: ConfigValue) -> Result<bool, ConfigError> {
    match value {
        ConfigValue::Bool(v) => Ok(v),
        ConfigValue::Float(_) => Err(ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: "bool",
        }),
    }
}

/// Builder for [`StencilConfig`].
pub struct StencilConfigBuilder {
    config: StencilConfig,
}

impl StencilConfigBuilder {
    /// Set the self weight (default: 1.0).
    pub fn self_weight(mut self, w: f32) -> Self {
        self.config.self_weight = w;
        self
    }

    /// Set the neighbour weight (default: 0.1).
    pub fn neighbor_weight(mut self, w: f32) -> Self {
        self.config.neighbor_weight = w;
        self
    }

    /// Enable per-cell averaging (default: false).
    pub fn enable_average(mut self, on: bool) -> Self {
        self.config.enable_average = on;
        self
    }

    /// Enable weight-sum normalization (default: false).
    pub fn enable_normalization(mut self, on: bool) -> Self {
        self.config.enable_normalization = on;
        self
    }

    /// Default for the `include_self` argument (default: true).
    pub fn include_self(mut self, on: bool) -> Self {
        self.config.include_self = on;
        self
    }

    /// Whole-grid averaging behaviour (default: [`AverageMode::Reference`]).
    pub fn average_mode(mut self, mode: AverageMode) -> Self {
        self.config.average_mode = mode;
        self
    }

    /// Build, validating the weights.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFiniteWeight`] if either weight is NaN or infinite.
    pub fn build(self) -> Result<StencilConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
