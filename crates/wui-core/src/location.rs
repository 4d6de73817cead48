#![forbid(unsafe_code)]

//! Host locations and change detection.
//!
//! A [`Location`] is whatever the host router calls the current page
//! (`/send`, `/contacts?tab=recent`, ...). The overlay layer never parses it;
//! it only needs to know when it changes.
//!
//! [`LocationTracker`] turns a stream of "current location" reports into
//! [`LocationChange`] notifications. Reporting the same location twice in a
//! row is not a change.

use std::fmt;

/// Opaque route of the host application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location(String);

impl Location {
    /// Create a location from a route string.
    #[must_use]
    pub fn new(route: impl Into<String>) -> Self {
        Self(route.into())
    }

    /// The route as given by the host.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(route: &str) -> Self {
        Self::new(route)
    }
}

/// Notification that the host moved to a different location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationChange {
    /// Previous location, `None` for the first report of a session.
    pub from: Option<Location>,
    /// New current location.
    pub to: Location,
}

/// Remembers the last reported location and detects changes.
#[derive(Debug, Clone, Default)]
pub struct LocationTracker {
    current: Option<Location>,
}

impl LocationTracker {
    /// Create a tracker that has seen no location yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last reported location.
    #[must_use]
    pub fn current(&self) -> Option<&Location> {
        self.current.as_ref()
    }

    /// Record `location` as current.
    ///
    /// Returns the change when it differs from the previous report. The very
    /// first report of a session counts as a change.
    pub fn observe(&mut self, location: Location) -> Option<LocationChange> {
        if self.current.as_ref() == Some(&location) {
            return None;
        }
        let from = self.current.replace(location.clone());
        Some(LocationChange { from, to: location })
    }
}
