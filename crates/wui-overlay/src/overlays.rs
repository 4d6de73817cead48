#![forbid(unsafe_code)]

//! The overlay orchestrator facade.
//!
//! [`Overlays`] is a cheap, cloneable handle to one session's overlay table.
//! It is passed down explicitly from the scope that owns the session; there
//! is no global instance.
//!
//! # Invariants
//!
//! - Every mutation goes through [`Overlays::open_with`], [`Overlays::close`]
//!   or [`Overlays::close_all`]. The cancellation router, navigation teardown
//!   and close handles all call these.
//! - Observers are notified after the table mutation is complete, in
//!   mutation order, and only for effective changes. A mutation made from
//!   inside an observer is queued and delivered after the change currently
//!   being delivered has reached every observer.
//! - [`Overlays::close_all`] closes one overlay at a time, topmost first, and
//!   each `Closed` notification is delivered before the next close.
//! - No borrow of the table is held while observers run, so an observer may
//!   call back into the facade.
//!
//! # Failure Modes
//!
//! - Closing an overlay that is not open is a silent no-op.
//! - Label-based entry points log unknown labels and do nothing.
//! - A [`CloseHandle`] whose session is gone does nothing.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use wui_core::signal::{SignalHub, Subscription};

use crate::config::OverlayConfig;
use crate::key::{OverlayKey, OverlayPayload};
use crate::order::{self, ZLayering};
use crate::table::{OpenSeq, OverlayTable};

/// Change notification emitted after each effective mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayChange<K> {
    /// `key` opened (or was re-opened) with stamp `seq`.
    Opened {
        /// The overlay.
        key: K,
        /// Its new open stamp.
        seq: OpenSeq,
    },
    /// `key` closed.
    Closed {
        /// The overlay.
        key: K,
    },
}

impl<K: Copy> OverlayChange<K> {
    /// The overlay this change is about.
    pub fn key(&self) -> K {
        match *self {
            Self::Opened { key, .. } | Self::Closed { key } => key,
        }
    }
}

/// Options for [`Overlays::open_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOptions {
    /// Close every open overlay before opening this one.
    pub close_all_first: bool,
}

impl OpenOptions {
    /// Close everything else first.
    #[must_use]
    pub const fn exclusive() -> Self {
        Self {
            close_all_first: true,
        }
    }
}

/// Result of routing one cancellation signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome<K> {
    /// The topmost overlay was closed.
    Closed(K),
    /// The topmost overlay is non-cancelable; nothing closed.
    Suppressed(K),
    /// No overlay was open.
    Idle,
}

pub(crate) struct Shared<P: OverlayPayload> {
    table: RefCell<OverlayTable<P>>,
    config: OverlayConfig<P::Key>,
    changes: SignalHub<OverlayChange<P::Key>>,
    pending: RefCell<VecDeque<OverlayChange<P::Key>>>,
    publishing: Cell<bool>,
}

/// Handle to a session's overlay orchestrator.
pub struct Overlays<P: OverlayPayload> {
    shared: Rc<Shared<P>>,
}

impl<P: OverlayPayload> Clone for Overlays<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<P: OverlayPayload> Default for Overlays<P> {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

impl<P: OverlayPayload> fmt::Debug for Overlays<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlays")
            .field("stack", &self.stack())
            .field("observers", &self.shared.changes.listener_count())
            .finish()
    }
}

impl<P: OverlayPayload> Overlays<P> {
    /// Create an orchestrator with every overlay closed.
    pub fn new(config: OverlayConfig<P::Key>) -> Self {
        Self {
            shared: Rc::new(Shared {
                table: RefCell::new(OverlayTable::new()),
                config,
                changes: SignalHub::new(),
                pending: RefCell::new(VecDeque::new()),
                publishing: Cell::new(false),
            }),
        }
    }

    /// The configuration this orchestrator was built with.
    pub fn config(&self) -> &OverlayConfig<P::Key> {
        &self.shared.config
    }

    /// A non-owning handle.
    pub fn downgrade(&self) -> WeakOverlays<P> {
        WeakOverlays {
            shared: Rc::downgrade(&self.shared),
        }
    }

    // --- Mutations ---

    /// Open the overlay named by `payload`.
    pub fn open(&self, payload: P) {
        self.open_with(payload, OpenOptions::default());
    }

    /// Close every overlay, then open the one named by `payload`.
    pub fn open_exclusive(&self, payload: P) {
        self.open_with(payload, OpenOptions::exclusive());
    }

    /// Open `key` with its default payload.
    pub fn open_default(&self, key: P::Key) {
        self.open(P::default_for(key));
    }

    /// Open the overlay named by `payload`.
    ///
    /// With `close_all_first`, the whole close pass completes before the new
    /// overlay is stamped, so the new overlay is never caught by it.
    pub fn open_with(&self, payload: P, options: OpenOptions) {
        if options.close_all_first {
            self.close_all();
        }
        let key = payload.key();
        let opened = {
            let mut table = self.shared.table.borrow_mut();
            table.open(payload).map(|seq| (seq, table.open_count()))
        };
        if let Some((seq, open_count)) = opened {
            tracing::debug!(
                overlay = key.label(),
                seq,
                exclusive = options.close_all_first,
                open_count,
                "overlay opened"
            );
            self.publish(OverlayChange::Opened { key, seq });
        }
    }

    /// Close `key`. Closing an overlay that is not open does nothing.
    pub fn close(&self, key: P::Key) {
        self.close_one(key);
    }

    /// Close every overlay open at the time of the call, topmost first.
    pub fn close_all(&self) {
        let stack = self.stack();
        let mut count = 0;
        for key in stack.into_iter().rev() {
            if self.close_one(key) {
                count += 1;
            }
        }
        if count > 0 {
            tracing::debug!(count, "all overlays closed");
        }
    }

    fn close_one(&self, key: P::Key) -> bool {
        let closed = self.shared.table.borrow_mut().close(key);
        if closed {
            tracing::debug!(overlay = key.label(), "overlay closed");
            self.publish(OverlayChange::Closed { key });
        }
        closed
    }

    /// Route one cancellation signal.
    ///
    /// Closes the topmost overlay unless it is non-cancelable, in which case
    /// the signal is dropped. Lower overlays are never considered.
    pub fn cancel(&self) -> CancelOutcome<P::Key> {
        let Some(top) = self.topmost() else {
            return CancelOutcome::Idle;
        };
        if !self.shared.config.is_cancelable(top) {
            tracing::debug!(overlay = top.label(), "cancel suppressed by non-cancelable overlay");
            return CancelOutcome::Suppressed(top);
        }
        self.close(top);
        CancelOutcome::Closed(top)
    }

    /// Open by label with the overlay's default payload.
    ///
    /// Returns `false` (and logs) when the label is unknown.
    pub fn open_by_label(&self, label: &str) -> bool {
        match P::Key::from_label(label) {
            Ok(key) => {
                self.open_default(key);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "open ignored");
                false
            }
        }
    }

    /// Close by label.
    ///
    /// Returns `false` (and logs) when the label is unknown.
    pub fn close_by_label(&self, label: &str) -> bool {
        match P::Key::from_label(label) {
            Ok(key) => {
                self.close(key);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "close ignored");
                false
            }
        }
    }

    /// Queue `change` and, unless a delivery is already running further up
    /// the stack, deliver the queue in FIFO order.
    fn publish(&self, change: OverlayChange<P::Key>) {
        let shared = &self.shared;
        shared.pending.borrow_mut().push_back(change);
        if shared.publishing.replace(true) {
            return;
        }
        let _reset = PublishingReset(&shared.publishing);
        loop {
            let next = shared.pending.borrow_mut().pop_front();
            let Some(change) = next else { break };
            shared.changes.emit(&change);
        }
    }

    // --- Queries ---

    /// Whether `key` is open.
    pub fn is_open(&self, key: P::Key) -> bool {
        self.shared.table.borrow().is_open(key)
    }

    /// Open stamp of `key`, if open.
    pub fn opened_at(&self, key: P::Key) -> Option<OpenSeq> {
        self.shared.table.borrow().opened_at(key)
    }

    /// Payload of `key` together with a close callback bound to `key`.
    ///
    /// `None` when `key` is closed.
    pub fn payload(&self, key: P::Key) -> Option<Attached<P>> {
        let payload = self.shared.table.borrow().payload(key).cloned()?;
        Some(Attached {
            payload,
            on_close: self.close_handle(key),
        })
    }

    /// A callback that closes `key` on this orchestrator.
    pub fn close_handle(&self, key: P::Key) -> CloseHandle<P> {
        CloseHandle {
            key,
            target: self.downgrade(),
        }
    }

    /// Z-order of `key`; closed overlays report the configured base.
    pub fn z_order(&self, key: P::Key) -> i32 {
        order::z_order(&self.shared.table.borrow(), key, self.layering())
    }

    /// The most recently opened overlay that is still open.
    pub fn topmost(&self) -> Option<P::Key> {
        order::topmost(&self.shared.table.borrow())
    }

    /// Open overlays, bottom to top.
    pub fn stack(&self) -> Vec<P::Key> {
        order::stack(&self.shared.table.borrow())
    }

    /// Open overlays with their z-orders, bottom to top.
    pub fn layers(&self) -> Vec<(P::Key, i32)> {
        order::layers(&self.shared.table.borrow(), self.layering())
    }

    /// Number of open overlays.
    pub fn open_count(&self) -> usize {
        self.shared.table.borrow().open_count()
    }

    /// Whether any overlay is open.
    pub fn any_open(&self) -> bool {
        self.open_count() > 0
    }

    /// Copy of the current table.
    pub fn snapshot(&self) -> OverlayTable<P> {
        self.shared.table.borrow().clone()
    }

    fn layering(&self) -> ZLayering {
        self.shared.config.layering()
    }

    // --- Observation ---

    /// Register an observer for table changes.
    ///
    /// The observer runs after each effective mutation and stays registered
    /// while the returned guard lives.
    #[must_use = "dropping the subscription unregisters the observer immediately"]
    pub fn subscribe(&self, observer: impl Fn(&OverlayChange<P::Key>) + 'static) -> Subscription {
        self.shared.changes.subscribe(observer)
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.shared.changes.listener_count()
    }
}

/// Clears the delivery flag even if an observer unwinds.
struct PublishingReset<'a>(&'a Cell<bool>);

impl Drop for PublishingReset<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Non-owning handle to an orchestrator.
pub struct WeakOverlays<P: OverlayPayload> {
    shared: Weak<Shared<P>>,
}

impl<P: OverlayPayload> Clone for WeakOverlays<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<P: OverlayPayload> WeakOverlays<P> {
    /// The orchestrator, if it still exists.
    pub fn upgrade(&self) -> Option<Overlays<P>> {
        self.shared.upgrade().map(|shared| Overlays { shared })
    }
}

/// Zero-argument callback that closes one overlay.
///
/// Calling it has exactly the effect of [`Overlays::close`] for its key.
pub struct CloseHandle<P: OverlayPayload> {
    key: P::Key,
    target: WeakOverlays<P>,
}

impl<P: OverlayPayload> Clone for CloseHandle<P> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            target: self.target.clone(),
        }
    }
}

impl<P: OverlayPayload> fmt::Debug for CloseHandle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloseHandle")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<P: OverlayPayload> CloseHandle<P> {
    /// The overlay this handle closes.
    pub fn key(&self) -> P::Key {
        self.key
    }

    /// Close the overlay.
    pub fn close(&self) {
        if let Some(overlays) = self.target.upgrade() {
            overlays.close(self.key);
        }
    }
}

/// An open overlay's payload with its close callback.
#[derive(Debug, Clone)]
pub struct Attached<P: OverlayPayload> {
    /// The payload given to `open`.
    pub payload: P,
    /// Closes this overlay.
    pub on_close: CloseHandle<P>,
}

impl<P: OverlayPayload> Attached<P> {
    /// Close this overlay.
    pub fn close(&self) {
        self.on_close.close();
    }
}
