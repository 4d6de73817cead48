#![forbid(unsafe_code)]

//! Overlay orchestration configuration.
//!
//! # Environment Variables
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `WUI_OVERLAY_Z_BASE` | Z-order of the bottom overlay (integer) |
//! | `WUI_OVERLAY_Z_STEP` | Z-order gap between overlays (integer, at least 1) |
//!
//! The non-cancelable set is part of the application's overlay design and
//! is only configurable in code.
//!
//! # Invariants
//!
//! - The layering always fits `K::ALL.len()` stacked overlays without
//!   overflowing `i32`. Builders lower the values to fit; environment
//!   overrides that do not fit are rejected.

use crate::error::ConfigError;
use crate::key::OverlayKey;
use crate::order::ZLayering;

/// Environment variable overriding [`ZLayering::base`].
pub const ENV_Z_BASE: &str = "WUI_OVERLAY_Z_BASE";

/// Environment variable overriding [`ZLayering::step`].
pub const ENV_Z_STEP: &str = "WUI_OVERLAY_Z_STEP";

/// Configuration for an overlay orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig<K: OverlayKey> {
    layering: ZLayering,
    non_cancelable: Vec<K>,
}

impl<K: OverlayKey> Default for OverlayConfig<K> {
    fn default() -> Self {
        Self {
            layering: ZLayering::default().fitted(K::ALL.len()),
            non_cancelable: Vec::new(),
        }
    }
}

impl<K: OverlayKey> OverlayConfig<K> {
    /// Default configuration: base 50, step 10, every overlay cancelable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the z-order of the bottom overlay.
    ///
    /// Lowered if every overlay could not otherwise be stacked above it.
    #[must_use]
    pub fn with_z_base(mut self, base: i32) -> Self {
        self.layering = ZLayering::new(base, self.layering.step()).fitted(K::ALL.len());
        self
    }

    /// Set the z-order gap; clamped to at least 1 and shrunk if every
    /// overlay could not otherwise be stacked.
    #[must_use]
    pub fn with_z_step(mut self, step: i32) -> Self {
        self.layering = ZLayering::new(self.layering.base(), step).fitted(K::ALL.len());
        self
    }

    /// Z-order constants.
    #[must_use]
    pub fn layering(&self) -> ZLayering {
        self.layering
    }

    /// Make `key` ignore the cancellation signal.
    #[must_use]
    pub fn non_cancelable(mut self, key: K) -> Self {
        if !self.non_cancelable.contains(&key) {
            self.non_cancelable.push(key);
        }
        self
    }

    /// Whether the cancellation signal may close `key`.
    #[must_use]
    pub fn is_cancelable(&self, key: K) -> bool {
        !self.non_cancelable.contains(&key)
    }

    /// Overlays that ignore the cancellation signal.
    #[must_use]
    pub fn non_cancelable_keys(&self) -> &[K] {
        &self.non_cancelable
    }

    /// Apply environment overrides from the process environment.
    ///
    /// Invalid values are logged and ignored.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        let fallback = self.clone();
        match self.apply_env_with(|key| std::env::var(key).ok()) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring overlay environment overrides");
                fallback
            }
        }
    }

    /// Apply environment overrides using a custom lookup (for tests).
    pub fn apply_env_with<F>(mut self, get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut base = self.layering.base();
        let mut step = self.layering.step();
        let base_value = get_env(ENV_Z_BASE);
        let step_value = get_env(ENV_Z_STEP);
        if let Some(value) = &base_value {
            base = parse_i32(ENV_Z_BASE, value)?;
        }
        if let Some(value) = &step_value {
            step = parse_i32(ENV_Z_STEP, value)?;
            if step < 1 {
                return Err(ConfigError::InvalidValue {
                    var: ENV_Z_STEP,
                    value: value.clone(),
                    reason: "must be at least 1",
                });
            }
        }
        let layering = ZLayering::new(base, step);
        if !layering.fits(K::ALL.len()) {
            let (var, value) = match (base_value, step_value) {
                (Some(value), _) => (ENV_Z_BASE, value),
                (None, Some(value)) => (ENV_Z_STEP, value),
                (None, None) => (ENV_Z_BASE, base.to_string()),
            };
            return Err(ConfigError::InvalidValue {
                var,
                value,
                reason: "no room to stack every overlay",
            });
        }
        self.layering = layering;
        Ok(self)
    }
}

fn parse_i32(var: &'static str, value: &str) -> Result<i32, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            var,
            value: value.to_owned(),
            reason: "not an integer",
        })
}
