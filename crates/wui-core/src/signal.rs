#![forbid(unsafe_code)]

//! Single-threaded signal hubs.
//!
//! A [`SignalHub`] is a broadcast point for one kind of host signal (the
//! cancellation key, location changes, overlay table changes). Listeners are
//! registered with [`SignalHub::subscribe`] and stay registered exactly as
//! long as the returned [`Subscription`] guard is alive.
//!
//! # How it works
//!
//! 1. `subscribe()` stores the listener under a fresh [`SubId`]
//! 2. `emit()` snapshots the listener list, then calls each listener that is
//!    still registered at the moment its turn comes
//! 3. Dropping the guard removes the listener
//!
//! No borrow is held while a listener runs, so listeners may subscribe,
//! unsubscribe, or emit on the same hub.
//!
//! # Failure Modes
//!
//! - Dropping a guard after its hub is gone is a no-op.
//! - A listener removed during an emit is not called later in that emit.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// A unique identifier for a listener within one hub.
pub type SubId = u64;

type Listener<T> = Rc<dyn Fn(&T)>;

struct HubInner<T> {
    listeners: RefCell<Vec<(SubId, Listener<T>)>>,
    next_id: Cell<SubId>,
}

impl<T> HubInner<T> {
    fn contains(&self, id: SubId) -> bool {
        self.listeners.borrow().iter().any(|(sub, _)| *sub == id)
    }
}

/// Removal side of a hub, erased over the signal type.
trait Release {
    fn release(&self, id: SubId);
}

impl<T> Release for HubInner<T> {
    fn release(&self, id: SubId) {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != id);
        if listeners.len() != before {
            tracing::trace!(sub_id = id, remaining = listeners.len(), "listener released");
        }
    }
}

/// Broadcast point for one signal type.
///
/// Cloning a hub yields another handle to the same listener set.
pub struct SignalHub<T> {
    inner: Rc<HubInner<T>>,
}

impl<T> Clone for SignalHub<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for SignalHub<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(HubInner {
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
            }),
        }
    }
}

impl<T> fmt::Debug for SignalHub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<T: 'static> SignalHub<T> {
    /// Create a hub with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    ///
    /// The listener is removed when the returned guard is dropped.
    #[must_use = "dropping the subscription unregisters the listener immediately"]
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        tracing::trace!(sub_id = id, "listener registered");

        let weak: Weak<HubInner<T>> = Rc::downgrade(&self.inner);
        let hub: Weak<dyn Release> = weak;
        Subscription { id, hub }
    }

    /// Deliver `signal` to every registered listener.
    ///
    /// Returns how many listeners were called.
    pub fn emit(&self, signal: &T) -> usize {
        let snapshot: Vec<(SubId, Listener<T>)> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        let mut delivered = 0;
        for (id, listener) in snapshot {
            if self.inner.contains(id) {
                listener(signal);
                delivered += 1;
            }
        }
        delivered
    }
}

impl<T> SignalHub<T> {
    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.listener_count() == 0
    }
}

/// Guard for a registered listener.
///
/// Dropping it unregisters the listener.
#[must_use = "dropping the subscription unregisters the listener immediately"]
pub struct Subscription {
    id: SubId,
    hub: Weak<dyn Release>,
}

impl Subscription {
    /// Identifier of the listener within its hub.
    #[must_use]
    pub fn id(&self) -> SubId {
        self.id
    }

    /// Whether the hub still exists.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.hub.strong_count() > 0
    }

    /// Unregister now. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {}
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.release(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_reaches_all_listeners() {
        let hub = SignalHub::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = {
            let seen = Rc::clone(&seen);
            hub.subscribe(move |v| seen.borrow_mut().push(("a", *v)))
        };
        let b = {
            let seen = Rc::clone(&seen);
            hub.subscribe(move |v| seen.borrow_mut().push(("b", *v)))
        };

        assert_eq!(hub.emit(&7), 2);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
        drop((a, b));
    }

    #[test]
    fn drop_releases_listener() {
        let hub = SignalHub::<()>::new();
        let sub = hub.subscribe(|_| {});
        assert_eq!(hub.listener_count(), 1);
        drop(sub);
        assert!(hub.is_idle());
        assert_eq!(hub.emit(&()), 0);
    }

    #[test]
    fn unsubscribe_is_drop() {
        let hub = SignalHub::<()>::new();
        let sub = hub.subscribe(|_| {});
        sub.unsubscribe();
        assert!(hub.is_idle());
    }

    #[test]
    fn ids_are_unique() {
        let hub = SignalHub::<()>::new();
        let a = hub.subscribe(|_| {});
        let b = hub.subscribe(|_| {});
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn guard_outliving_hub_is_harmless() {
        let hub = SignalHub::<()>::new();
        let sub = hub.subscribe(|_| {});
        drop(hub);
        assert!(!sub.is_attached());
        drop(sub);
    }

    #[test]
    fn clones_share_listeners() {
        let hub = SignalHub::<()>::new();
        let other = hub.clone();
        let _sub = other.subscribe(|_| {});
        assert_eq!(hub.listener_count(), 1);
    }

    #[test]
    fn listener_can_subscribe_during_emit() {
        let hub = SignalHub::<()>::new();
        let late: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let _sub = {
            let hub2 = hub.clone();
            let late = Rc::clone(&late);
            hub.subscribe(move |_| late.borrow_mut().push(hub2.subscribe(|_| {})))
        };

        // The listener added mid-emit is not in the snapshot.
        assert_eq!(hub.emit(&()), 1);
        assert_eq!(hub.listener_count(), 2);
    }

    #[test]
    fn listener_removed_mid_emit_is_skipped() {
        let hub = SignalHub::<()>::new();
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(Cell::new(0));

        let _killer = {
            let victim = Rc::clone(&victim);
            hub.subscribe(move |_| {
                victim.borrow_mut().take();
            })
        };
        *victim.borrow_mut() = Some({
            let calls = Rc::clone(&calls);
            hub.subscribe(move |_| calls.set(calls.get() + 1))
        });

        assert_eq!(hub.emit(&()), 1);
        assert_eq!(calls.get(), 0);
        assert_eq!(hub.listener_count(), 1);
    }
}
