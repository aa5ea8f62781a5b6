//! Shared, thread-safe handle to the stencil configuration.
//!
//! A UI or input thread holds a clone of [`LiveConfig`] and edits values
//! while the session runs. The session takes one snapshot at the start of
//! every frame, so a frame never sees a half-applied change.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use eddy_core::{ConfigError, ConfigValue, StencilConfig};

/// Cloneable handle around `Arc<Mutex<StencilConfig>>`.
#[derive(Clone, Debug, Default)]
pub struct LiveConfig {
    inner: Arc<Mutex<StencilConfig>>,
}

impl LiveConfig {
    /// Wrap an initial configuration.
    pub fn new(config: StencilConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(config)),
        }
    }

    // The value is `Copy` and always valid, so a poisoned lock still
    // holds a usable configuration.
    fn lock(&self) -> MutexGuard<'_, StencilConfig> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy out the current configuration.
    pub fn snapshot(&self) -> StencilConfig {
        *self.lock()
    }

    /// Replace the whole configuration after validating it.
    pub fn replace(&self, config: StencilConfig) -> Result<(), ConfigError> {
        config.validate()?;
        *self.lock() = config;
        Ok(())
    }

    /// Apply one named value. See [`StencilConfig::set_named`].
    pub fn set_named(&self, key: &str, value: ConfigValue) -> Result<(), ConfigError> {
        self.lock().set_named(key, value)
    }

    /// Apply several named values under one lock, so no frame observes a
    /// partial batch. On error nothing is applied.
    pub fn apply_named<'a, I>(&self, entries: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (&'a str, ConfigValue)>,
    {
        let mut guard = self.lock();
        let mut next = *guard;
        next.apply_named(entries)?;
        *guard = next;
        Ok(())
    }
}
