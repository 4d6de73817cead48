#![forbid(unsafe_code)]

//! End-to-end overlay behavior through a session.
//!
//! Covers the stacking, cancellation and teardown contract as seen by a host
//! that only feeds events and calls the facade.

use std::cell::RefCell;
use std::rc::Rc;

use wui_core::event::{Event, KeyCode, KeyEvent};
use wui_core::location::Location;
use wui_overlay::{
    overlay_set, OverlayChange, OverlayConfig, OverlayKey, OverlaySession, Overlays,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendConfirm {
    pub recipient: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenPicker {
    pub selected: Option<String>,
}

overlay_set! {
    /// Overlays of the test wallet.
    pub enum Wallet;
    /// Payloads of the test wallet.
    pub enum WalletData {
        SendConfirm(SendConfirm) = "send-confirm",
        TokenPicker(TokenPicker) = "token-picker",
        Receive(()) = "receive",
        TxPending(()) = "tx-pending",
    }
}

fn session() -> OverlaySession<WalletData> {
    OverlaySession::new(OverlayConfig::new().non_cancelable(Wallet::TxPending))
}

fn esc() -> Event {
    Event::Key(KeyEvent::new(KeyCode::Escape))
}

fn nav(to: &str) -> Event {
    Event::Navigate(Location::new(to))
}

#[test]
fn cancel_closes_latest_and_keeps_earlier() {
    let mut s = session();
    let o = s.overlays().clone();
    o.open_default(Wallet::Receive);
    o.open_default(Wallet::TokenPicker);

    s.handle_event(&esc());
    assert!(!o.is_open(Wallet::TokenPicker));
    assert!(o.is_open(Wallet::Receive));
}

#[test]
fn repeated_cancel_unwinds_in_reverse_open_order() {
    let mut s = session();
    let o = s.overlays().clone();
    o.open_default(Wallet::Receive);
    o.open_default(Wallet::TokenPicker);
    o.open_default(Wallet::SendConfirm);

    let closed = Rc::new(RefCell::new(Vec::new()));
    let _sub = {
        let closed = Rc::clone(&closed);
        o.subscribe(move |change| {
            if let OverlayChange::Closed { key } = change {
                closed.borrow_mut().push(*key);
            }
        })
    };

    for _ in 0..3 {
        s.handle_event(&esc());
    }
    assert_eq!(
        *closed.borrow(),
        vec![Wallet::SendConfirm, Wallet::TokenPicker, Wallet::Receive]
    );

    // Fourth cancel: nothing left, nothing happens.
    s.handle_event(&esc());
    assert_eq!(closed.borrow().len(), 3);
    assert!(!o.any_open());
}

#[test]
fn topmost_has_strictly_greatest_z_order() {
    let s = session();
    let o = s.overlays();
    o.open_default(Wallet::TokenPicker);
    o.open_default(Wallet::Receive);
    o.open_default(Wallet::SendConfirm);
    o.close(Wallet::Receive);
    o.open_default(Wallet::Receive);

    let top = o.topmost().expect("something open");
    assert_eq!(top, Wallet::Receive);
    let top_z = o.z_order(top);
    for key in o.stack() {
        if key != top {
            assert!(top_z > o.z_order(key), "{key:?} is not below {top:?}");
        }
    }
}

#[test]
fn topmost_stays_strictly_above_at_the_top_of_the_z_range() {
    let s = OverlaySession::<WalletData>::new(OverlayConfig::new().with_z_base(i32::MAX));
    let o = s.overlays();
    for &key in Wallet::ALL {
        o.open_default(key);
    }

    let z: Vec<i32> = o.layers().into_iter().map(|(_, z)| z).collect();
    assert_eq!(z.len(), Wallet::ALL.len());
    assert_eq!(z.last().copied(), Some(i32::MAX));
    assert!(z.windows(2).all(|w| w[0] < w[1]), "z-orders {z:?}");
}

#[test]
fn close_all_closes_every_overlay() {
    let s = session();
    let o = s.overlays();
    for &key in Wallet::ALL {
        o.open_default(key);
    }
    o.close_all();
    for &key in Wallet::ALL {
        assert!(!o.is_open(key), "{key:?} still open");
        assert_eq!(o.opened_at(key), None);
        assert_eq!(o.z_order(key), 50);
    }
}

#[test]
fn navigation_closes_open_overlays() {
    let mut s = session();
    s.handle_event(&nav("/wallet"));
    let o = s.overlays().clone();
    o.open_default(Wallet::Receive);
    o.open_default(Wallet::TokenPicker);

    s.handle_event(&nav("/contacts"));
    assert!(!o.is_open(Wallet::Receive));
    assert!(!o.is_open(Wallet::TokenPicker));
}

#[test]
fn non_cancelable_overlay_ignores_cancel() {
    let mut s = session();
    let o = s.overlays().clone();
    o.open_default(Wallet::TxPending);

    s.handle_event(&esc());
    assert!(o.is_open(Wallet::TxPending));
    assert_eq!(o.open_count(), 1);
}

#[test]
fn non_cancelable_on_top_shields_lower_overlays() {
    let mut s = session();
    let o = s.overlays().clone();
    o.open_default(Wallet::Receive);
    o.open_default(Wallet::TxPending);

    s.handle_event(&esc());
    assert_eq!(o.stack(), vec![Wallet::Receive, Wallet::TxPending]);
}

#[test]
fn navigation_closes_non_cancelable_overlay() {
    let mut s = session();
    s.handle_event(&nav("/send"));
    let o = s.overlays().clone();
    o.open_default(Wallet::TxPending);

    s.handle_event(&esc());
    assert!(o.is_open(Wallet::TxPending));

    s.handle_event(&nav("/activity"));
    assert!(!o.is_open(Wallet::TxPending));
}

#[test]
fn exclusive_open_replaces_existing_overlay() {
    let s = session();
    let o = s.overlays();
    o.open_default(Wallet::Receive);
    let previous = o.opened_at(Wallet::Receive).expect("open");

    o.open_exclusive(WalletData::SendConfirm(SendConfirm {
        recipient: "0xabc".into(),
        amount: 12,
    }));
    assert!(!o.is_open(Wallet::Receive));
    let now = o.opened_at(Wallet::SendConfirm).expect("open");
    assert!(now > previous);
}

#[test]
fn closing_never_opened_overlay_changes_nothing() {
    let s = session();
    let o = s.overlays();
    o.open_default(Wallet::Receive);
    let before = o.snapshot();
    let changes = Rc::new(RefCell::new(0));
    let _sub = {
        let changes = Rc::clone(&changes);
        o.subscribe(move |_| *changes.borrow_mut() += 1)
    };

    o.close(Wallet::TokenPicker);

    let after = o.snapshot();
    for &key in Wallet::ALL {
        assert_eq!(before.opened_at(key), after.opened_at(key));
    }
    assert_eq!(before.next_seq(), after.next_seq());
    assert_eq!(*changes.borrow(), 0);
}

#[test]
fn payload_round_trips_with_close_callback() {
    let s = session();
    let o = s.overlays();
    let confirm = SendConfirm {
        recipient: "0xdef".into(),
        amount: 99,
    };
    o.open(WalletData::SendConfirm(confirm.clone()));

    let attached = o.payload(Wallet::SendConfirm).expect("open");
    match &attached.payload {
        WalletData::SendConfirm(data) => assert_eq!(data, &confirm),
        other => panic!("wrong payload: {other:?}"),
    }
    assert!(o.payload(Wallet::TokenPicker).is_none());

    // A collaborator dismisses itself without touching the facade.
    attached.on_close.close();
    assert!(!o.is_open(Wallet::SendConfirm));
}

#[test]
fn router_follows_open_state_across_many_changes() {
    let s = session();
    let o = s.overlays();
    assert!(!s.is_cancel_armed());
    o.open_default(Wallet::Receive);
    o.open_exclusive(WalletData::TokenPicker(TokenPicker::default()));
    assert!(s.is_cancel_armed());
    o.close(Wallet::TokenPicker);
    assert!(!s.is_cancel_armed());
    assert_eq!(s.cancel_hub().listener_count(), 0);
}

#[test]
fn independent_sessions_do_not_interfere() {
    let a: Overlays<WalletData> = Overlays::default();
    let b: Overlays<WalletData> = Overlays::default();
    a.open_default(Wallet::Receive);
    assert!(!b.is_open(Wallet::Receive));
    assert_eq!(b.topmost(), None);
}
