#![forbid(unsafe_code)]

//! Error types.
//!
//! The overlay facade itself never fails: its typed operations cannot be
//! given an identifier outside the registry. Errors only exist at the string
//! and environment boundaries.

use std::fmt;

/// Error from the overlay registry boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// A label did not name any overlay in the registry.
    UnknownOverlay(String),
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOverlay(label) => write!(f, "unknown overlay: {label:?}"),
        }
    }
}

impl std::error::Error for OverlayError {}

/// Error from reading overlay configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment override could not be used.
    InvalidValue {
        /// Environment variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { var, value, reason } => {
                write!(f, "invalid {var}={value:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
