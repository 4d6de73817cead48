#![forbid(unsafe_code)]

//! Overlay session: the owning scope for one UI session's overlays.
//!
//! A session owns the orchestrator, the two global signal hubs, the
//! cancellation router and the navigation teardown. Hosts feed it canonical
//! [`Event`]s; it turns cancel-key presses into [`CancelSignal`]s and
//! location reports into [`LocationChange`]s.
//!
//! Dropping the session releases every listener it registered.
//!
//! # Example
//!
//! ```
//! use wui_core::event::{Event, KeyCode, KeyEvent};
//! use wui_core::location::Location;
//! use wui_overlay::{overlay_set, OverlayConfig, OverlaySession};
//!
//! overlay_set! {
//!     enum Sheet;
//!     enum SheetData {
//!         Receive(()) = "receive",
//!         Send(()) = "send",
//!     }
//! }
//!
//! let mut session = OverlaySession::<SheetData>::new(OverlayConfig::new());
//! session.handle_event(&Event::Navigate(Location::new("/wallet")));
//!
//! let overlays = session.overlays().clone();
//! overlays.open_default(Sheet::Receive);
//! overlays.open_default(Sheet::Send);
//!
//! session.handle_event(&Event::Key(KeyEvent::new(KeyCode::Escape)));
//! assert_eq!(overlays.stack(), vec![Sheet::Receive]);
//!
//! session.handle_event(&Event::Navigate(Location::new("/contacts")));
//! assert!(!overlays.any_open());
//! ```

use wui_core::cancel::{CancelBinding, CancelSignal};
use wui_core::event::Event;
use wui_core::location::{Location, LocationChange, LocationTracker};
use wui_core::signal::SignalHub;

use crate::config::OverlayConfig;
use crate::key::OverlayPayload;
use crate::overlays::Overlays;
use crate::router::CancellationRouter;
use crate::teardown::NavigationTeardown;

/// What a session did with one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A cancellation signal was emitted to `listeners` listeners.
    Cancel {
        /// Listeners reached.
        listeners: usize,
    },
    /// A location change was emitted.
    Navigation,
    /// Nothing relevant to overlays.
    Ignored,
}

/// Owning scope for one session's overlay orchestration.
pub struct OverlaySession<P: OverlayPayload> {
    overlays: Overlays<P>,
    cancel_hub: SignalHub<CancelSignal>,
    location_hub: SignalHub<LocationChange>,
    binding: CancelBinding,
    tracker: LocationTracker,
    router: CancellationRouter<P>,
    _teardown: NavigationTeardown,
}

impl<P: OverlayPayload> OverlaySession<P> {
    /// Create a session with the default Escape binding.
    pub fn new(config: OverlayConfig<P::Key>) -> Self {
        let overlays = Overlays::new(config);
        let cancel_hub = SignalHub::new();
        let location_hub = SignalHub::new();
        let router = CancellationRouter::new(&overlays, &cancel_hub);
        let teardown = NavigationTeardown::new(&overlays, &location_hub);
        tracing::debug!("overlay session started");
        Self {
            overlays,
            cancel_hub,
            location_hub,
            binding: CancelBinding::default(),
            tracker: LocationTracker::new(),
            router,
            _teardown: teardown,
        }
    }

    /// Replace the cancellation key binding.
    #[must_use]
    pub fn with_binding(mut self, binding: CancelBinding) -> Self {
        self.binding = binding;
        self
    }

    /// Handle to this session's orchestrator.
    pub fn overlays(&self) -> &Overlays<P> {
        &self.overlays
    }

    /// The cancellation signal hub.
    pub fn cancel_hub(&self) -> &SignalHub<CancelSignal> {
        &self.cancel_hub
    }

    /// The location change hub.
    pub fn location_hub(&self) -> &SignalHub<LocationChange> {
        &self.location_hub
    }

    /// The last reported location.
    pub fn location(&self) -> Option<&Location> {
        self.tracker.current()
    }

    /// Whether the cancellation router is currently listening.
    pub fn is_cancel_armed(&self) -> bool {
        self.router.is_listening()
    }

    /// Feed one host event.
    pub fn handle_event(&mut self, event: &Event) -> Dispatch {
        match event {
            Event::Key(key) if self.binding.matches(key) => self.cancel(),
            Event::Key(_) => Dispatch::Ignored,
            Event::Navigate(location) => {
                if self.navigate(location.clone()) {
                    Dispatch::Navigation
                } else {
                    Dispatch::Ignored
                }
            }
        }
    }

    /// Emit the cancellation signal.
    pub fn cancel(&self) -> Dispatch {
        let listeners = self.cancel_hub.emit(&CancelSignal);
        Dispatch::Cancel { listeners }
    }

    /// Report the current location. Returns `true` if it was a change.
    pub fn navigate(&mut self, location: Location) -> bool {
        match self.tracker.observe(location) {
            Some(change) => {
                self.location_hub.emit(&change);
                true
            }
            None => false,
        }
    }
}

impl<P: OverlayPayload> Drop for OverlaySession<P> {
    fn drop(&mut self) {
        tracing::debug!(
            open_count = self.overlays.open_count(),
            "overlay session ended"
        );
    }
}
