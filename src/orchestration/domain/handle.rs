//! Per-backend input bundle handed to an initiator.

use super::BackendSettings;

/// Skip flag, configuration, and owned models for one backend.
///
/// The configuration and models of a skipped handle are unreachable: the
/// only accessor is [`BackendHandle::into_active`], which yields `None` when
/// the handle is skipped.
#[derive(Debug, Clone)]
pub struct BackendHandle<C, M> {
    skip: bool,
    config: C,
    models: M,
}

impl<C, M> BackendHandle<C, M> {
    /// Creates a handle.
    #[must_use]
    pub const fn new(skip: bool, config: C, models: M) -> Self {
        Self {
            skip,
            config,
            models,
        }
    }

    /// Builds a handle from a configuration block and the classified models.
    #[must_use]
    pub fn from_settings(settings: BackendSettings<C>, models: M) -> Self {
        Self::new(settings.skip, settings.options, models)
    }

    /// Returns whether the backend is skipped.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        self.skip
    }

    /// Consumes the handle, yielding its contents only when not skipped.
    #[must_use]
    pub fn into_active(self) -> Option<ActiveBackend<C, M>> {
        if self.skip {
            return None;
        }
        Some(ActiveBackend {
            config: self.config,
            models: self.models,
        })
    }
}

/// Contents of a non-skipped [`BackendHandle`], consumed by one initiator.
#[derive(Debug, Clone)]
pub struct ActiveBackend<C, M> {
    config: C,
    models: M,
}

impl<C, M> ActiveBackend<C, M> {
    /// Returns the backend configuration.
    #[must_use]
    pub const fn config(&self) -> &C {
        &self.config
    }

    /// Returns the owned models.
    #[must_use]
    pub const fn models(&self) -> &M {
        &self.models
    }

    /// Splits into configuration and models.
    #[must_use]
    pub fn into_parts(self) -> (C, M) {
        (self.config, self.models)
    }
}
