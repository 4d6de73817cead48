#![forbid(unsafe_code)]

//! Navigation teardown.
//!
//! Any location change closes every overlay. Unlike the cancellation key,
//! this ignores the non-cancelable set: leaving a page always leaves its
//! overlays behind.

use wui_core::location::LocationChange;
use wui_core::signal::{SignalHub, Subscription};

use crate::key::OverlayPayload;
use crate::overlays::Overlays;

/// Closes all overlays on every location change.
///
/// Listens for its whole lifetime; dropping it releases the listener.
pub struct NavigationTeardown {
    _listener: Subscription,
}

impl NavigationTeardown {
    /// Attach teardown for `overlays` to `hub`.
    pub fn new<P: OverlayPayload>(overlays: &Overlays<P>, hub: &SignalHub<LocationChange>) -> Self {
        let target = overlays.downgrade();
        let listener = hub.subscribe(move |change: &LocationChange| {
            let Some(overlays) = target.upgrade() else {
                return;
            };
            tracing::debug!(
                to = %change.to,
                open_count = overlays.open_count(),
                "navigation teardown"
            );
            overlays.close_all();
        });
        Self {
            _listener: listener,
        }
    }
}
