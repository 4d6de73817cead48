#![forbid(unsafe_code)]

//! Wallet UI overlay orchestration facade crate.
//!
//! This crate provides the stable surface area for hosts. It re-exports the
//! common types from the internal crates and offers a small prelude.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use wui_core::cancel::{CancelBinding, CancelSignal};
pub use wui_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use wui_core::location::{Location, LocationChange, LocationTracker};
pub use wui_core::signal::{SignalHub, SubId, Subscription};

// --- Overlay re-exports ----------------------------------------------------

pub use wui_overlay::{
    overlay_set, Attached, CancelOutcome, CancellationRouter, CloseHandle, ConfigError, Dispatch,
    NavigationTeardown, OpenOptions, OpenSeq, OverlayChange, OverlayConfig, OverlayError,
    OverlayKey, OverlayPayload, OverlaySession, OverlayTable, Overlays, ZLayering,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for hosts.
#[derive(Debug)]
pub enum Error {
    /// I/O failure in the host (terminal, files).
    Io(std::io::Error),
    /// Overlay registry lookup failed.
    Overlay(OverlayError),
    /// Configuration could not be read.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Overlay(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Overlay(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<OverlayError> for Error {
    fn from(err: OverlayError) -> Self {
        Self::Overlay(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for wui APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Attached, CancelOutcome, Error, Event, KeyCode, KeyEvent, Location, OverlayConfig,
        OverlayKey, OverlayPayload, OverlaySession, Overlays, Result, overlay_set,
    };

    pub use crate::{core, overlay};
}

pub use wui_core as core;
pub use wui_overlay as overlay;
