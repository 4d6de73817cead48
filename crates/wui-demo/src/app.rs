#![forbid(unsafe_code)]

//! Demo application state: a wallet with five overlays driven by keys.
//!
//! The app owns an [`OverlaySession`] and translates host key presses into
//! facade calls. Esc and navigation are handed to the session untouched so
//! the demo exercises the same paths a real host would.

use std::fmt::Write as _;

use wui::{Event, KeyCode, Location, OverlayConfig, OverlayKey, OverlaySession, overlay_set};

/// Transfer awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendConfirm {
    pub recipient: String,
    pub amount: u64,
}

impl Default for SendConfirm {
    fn default() -> Self {
        Self {
            recipient: "0x5aE1...c0De".into(),
            amount: 25_000,
        }
    }
}

/// Token selection list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPicker {
    pub selected: Option<String>,
}

/// Contact being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactEditor {
    pub name: String,
}

/// Transaction currently in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxPending {
    pub hash: String,
}

overlay_set! {
    /// Overlays of the demo wallet.
    pub enum WalletOverlay;
    /// Payloads carried by the demo wallet's overlays.
    pub enum WalletPayload {
        SendConfirm(SendConfirm) = "send-confirm",
        TokenPicker(TokenPicker) = "token-picker",
        Receive(()) = "receive",
        ContactEditor(ContactEditor) = "contact-editor",
        TxPending(TxPending) = "tx-pending",
    }
}

/// Pages the `n` key cycles through.
pub const ROUTES: &[&str] = &["/wallet", "/send", "/activity", "/contacts"];

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Demo state.
pub struct DemoApp {
    session: OverlaySession<WalletPayload>,
    route: usize,
    exclusive_next: bool,
}

impl DemoApp {
    /// Create the app on `route`. The transaction overlay is non-cancelable.
    pub fn new(config: OverlayConfig<WalletOverlay>, route: &str) -> Self {
        let config = config.non_cancelable(WalletOverlay::TxPending);
        let mut session = OverlaySession::new(config);
        session.navigate(Location::new(route));
        let route = ROUTES.iter().position(|r| *r == route).unwrap_or(0);
        Self {
            session,
            route,
            exclusive_next: false,
        }
    }

    /// The underlying session.
    pub fn session(&self) -> &OverlaySession<WalletPayload> {
        &self.session
    }

    /// Whether the next open will close everything else first.
    pub fn exclusive_pending(&self) -> bool {
        self.exclusive_next
    }

    /// Handle one event.
    pub fn handle(&mut self, event: &Event) -> Flow {
        let Some(key) = event.as_key() else {
            self.session.handle_event(event);
            return Flow::Continue;
        };
        if !key.is_press() {
            return Flow::Continue;
        }
        if key.ctrl() && key.is_char('c') {
            return Flow::Quit;
        }
        match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('x') => self.exclusive_next = true,
            KeyCode::Char('c') => self.session.overlays().close_all(),
            KeyCode::Char('n') => self.next_route(),
            KeyCode::Char(digit @ '1'..='5') => {
                let index = digit as usize - '1' as usize;
                self.open(WalletOverlay::ALL[index]);
            }
            _ => {
                self.session.handle_event(event);
            }
        }
        Flow::Continue
    }

    fn open(&mut self, key: WalletOverlay) {
        let payload = <WalletPayload as wui::OverlayPayload>::default_for(key);
        let overlays = self.session.overlays();
        if std::mem::take(&mut self.exclusive_next) {
            overlays.open_exclusive(payload);
        } else {
            overlays.open(payload);
        }
    }

    fn next_route(&mut self) {
        self.route = (self.route + 1) % ROUTES.len();
        self.session
            .handle_event(&Event::Navigate(Location::new(ROUTES[self.route])));
    }

    /// One-line status for the terminal.
    pub fn status(&self) -> String {
        let overlays = self.session.overlays();
        let mut out = String::new();
        let route = self.session.location().map_or("-", Location::as_str);
        let _ = write!(out, "[{route}] ");
        let layers = overlays.layers();
        if layers.is_empty() {
            out.push_str("no overlays");
        } else {
            let parts: Vec<String> = layers
                .iter()
                .map(|(key, z)| format!("{}@{z}", key.label()))
                .collect();
            out.push_str(&parts.join(" < "));
        }
        if self.session.is_cancel_armed() {
            out.push_str("  (esc armed)");
        }
        if self.exclusive_next {
            out.push_str("  (exclusive)");
        }
        out
    }
}
