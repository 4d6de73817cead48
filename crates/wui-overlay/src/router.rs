#![forbid(unsafe_code)]

//! Cancellation routing.
//!
//! The router forwards the session's single cancellation signal to the
//! topmost overlay (see [`Overlays::cancel`]). It listens on the cancel hub
//! only while at least one overlay is open: after every table change it
//! compares "should listen" against "is listening" and subscribes or
//! releases accordingly, the same reconcile step the runtime uses for
//! subscriptions.
//!
//! # Invariants
//!
//! - Listening iff the table has an open overlay (checked after every change).
//! - One signal closes at most one overlay.
//! - Dropping the router releases both of its subscriptions.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wui_core::cancel::CancelSignal;
use wui_core::signal::{SignalHub, Subscription};

use crate::key::OverlayPayload;
use crate::overlays::{Overlays, WeakOverlays};

struct RouterState<P: OverlayPayload> {
    overlays: WeakOverlays<P>,
    hub: SignalHub<CancelSignal>,
    listening: RefCell<Option<Subscription>>,
}

impl<P: OverlayPayload> RouterState<P> {
    fn reconcile(&self) {
        let wanted = self
            .overlays
            .upgrade()
            .is_some_and(|overlays| overlays.any_open());
        let mut listening = self.listening.borrow_mut();

        match (wanted, listening.is_some()) {
            (true, false) => {
                let target = self.overlays.clone();
                *listening = Some(self.hub.subscribe(move |_: &CancelSignal| {
                    if let Some(overlays) = target.upgrade() {
                        let outcome = overlays.cancel();
                        tracing::trace!(?outcome, "cancel signal routed");
                    }
                }));
                tracing::trace!("cancel router attached");
            }
            (false, true) => {
                // Dropping the guard unregisters the listener.
                listening.take();
                tracing::trace!("cancel router detached");
            }
            _ => {}
        }
    }
}

/// Routes the cancellation signal to the topmost overlay.
pub struct CancellationRouter<P: OverlayPayload> {
    state: Rc<RouterState<P>>,
    _watch: Subscription,
}

impl<P: OverlayPayload> CancellationRouter<P> {
    /// Attach a router for `overlays` to `hub`.
    pub fn new(overlays: &Overlays<P>, hub: &SignalHub<CancelSignal>) -> Self {
        let state = Rc::new(RouterState {
            overlays: overlays.downgrade(),
            hub: hub.clone(),
            listening: RefCell::new(None),
        });
        state.reconcile();

        let weak: Weak<RouterState<P>> = Rc::downgrade(&state);
        let watch = overlays.subscribe(move |_| {
            if let Some(state) = weak.upgrade() {
                state.reconcile();
            }
        });

        Self {
            state,
            _watch: watch,
        }
    }

    /// Whether the router currently listens on the cancel hub.
    pub fn is_listening(&self) -> bool {
        self.state.listening.borrow().is_some()
    }
}
