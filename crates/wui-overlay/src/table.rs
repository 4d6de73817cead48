#![forbid(unsafe_code)]

//! The overlay state table.
//!
//! One entry per registered overlay, created closed when the table is built
//! and never added or removed afterwards. Opening stamps the entry with the
//! next value of a per-table counter; closing clears the stamp and drops the
//! payload.
//!
//! # Invariants
//!
//! - `entries.len() == K::ALL.len()` and `entries[k.index()]` belongs to `k`.
//! - An entry is open iff it carries an open stamp.
//! - Stamps are strictly increasing across the table's lifetime, so no two
//!   open entries share one.
//!
//! # Failure Modes
//!
//! - A key whose `index()` is out of range (a broken hand-written
//!   [`OverlayKey`] impl) is treated as closed and ignored by every mutation.

use crate::key::{OverlayKey, OverlayPayload};

/// Open-order stamp. Larger means opened later.
pub type OpenSeq = u64;

/// State of one overlay.
#[derive(Debug, Clone)]
pub struct OverlayEntry<P> {
    opened_at: Option<OpenSeq>,
    payload: Option<P>,
}

impl<P> OverlayEntry<P> {
    const fn closed() -> Self {
        Self {
            opened_at: None,
            payload: None,
        }
    }

    /// Whether the overlay is open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.opened_at.is_some()
    }

    /// Open stamp, present iff open.
    #[inline]
    pub fn opened_at(&self) -> Option<OpenSeq> {
        self.opened_at
    }

    /// Payload of the open overlay.
    #[inline]
    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }
}

/// Per-overlay open state for one session.
#[derive(Debug, Clone)]
pub struct OverlayTable<P: OverlayPayload> {
    entries: Vec<OverlayEntry<P>>,
    next_seq: OpenSeq,
}

impl<P: OverlayPayload> Default for OverlayTable<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OverlayPayload> OverlayTable<P> {
    /// Create a table with every registered overlay closed.
    pub fn new() -> Self {
        debug_assert!(
            P::Key::ALL
                .iter()
                .enumerate()
                .all(|(i, key)| key.index() == i),
            "OverlayKey::index must match the position in ALL"
        );
        Self {
            entries: P::Key::ALL.iter().map(|_| OverlayEntry::closed()).collect(),
            next_seq: 1,
        }
    }

    /// Entry for `key`.
    pub fn entry(&self, key: P::Key) -> Option<&OverlayEntry<P>> {
        self.entries.get(key.index())
    }

    /// Whether `key` is open.
    pub fn is_open(&self, key: P::Key) -> bool {
        self.entry(key).is_some_and(OverlayEntry::is_open)
    }

    /// Open stamp of `key`, if open.
    pub fn opened_at(&self, key: P::Key) -> Option<OpenSeq> {
        self.entry(key).and_then(OverlayEntry::opened_at)
    }

    /// Payload of `key`, if open.
    pub fn payload(&self, key: P::Key) -> Option<&P> {
        self.entry(key).and_then(OverlayEntry::payload)
    }

    /// Number of open overlays.
    pub fn open_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_open()).count()
    }

    /// Open overlays with their stamps, in declaration order.
    pub fn iter_open(&self) -> impl Iterator<Item = (P::Key, OpenSeq)> + '_ {
        P::Key::ALL
            .iter()
            .zip(&self.entries)
            .filter_map(|(&key, entry)| entry.opened_at.map(|seq| (key, seq)))
    }

    /// The stamp the next open will receive.
    pub fn next_seq(&self) -> OpenSeq {
        self.next_seq
    }

    /// Open the overlay named by `payload`, replacing any previous payload.
    ///
    /// An already open overlay is re-stamped, which moves it to the top.
    /// Returns the new stamp.
    pub fn open(&mut self, payload: P) -> Option<OpenSeq> {
        let key = payload.key();
        let seq = self.next_seq;
        let entry = self.entries.get_mut(key.index())?;
        entry.opened_at = Some(seq);
        entry.payload = Some(payload);
        self.next_seq += 1;
        Some(seq)
    }

    /// Close `key`. Returns `false` if it was not open.
    pub fn close(&mut self, key: P::Key) -> bool {
        let Some(entry) = self.entries.get_mut(key.index()) else {
            return false;
        };
        if entry.opened_at.take().is_none() {
            return false;
        }
        entry.payload = None;
        true
    }
}
