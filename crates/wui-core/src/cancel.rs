#![forbid(unsafe_code)]

//! The global cancellation key.
//!
//! Exactly one logical "cancel" signal exists per session. Which physical
//! keys produce it is decided by a [`CancelBinding`]; the default is a plain
//! Escape press. Repeats and releases never count, so holding the key down
//! does not dismiss a whole stack of overlays.

use crate::event::{KeyCode, KeyEvent, Modifiers};

/// The cancellation signal delivered to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CancelSignal;

/// Set of key chords that produce a [`CancelSignal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelBinding {
    chords: Vec<(KeyCode, Modifiers)>,
}

impl Default for CancelBinding {
    fn default() -> Self {
        Self::escape()
    }
}

impl CancelBinding {
    /// Escape with no modifiers.
    #[must_use]
    pub fn escape() -> Self {
        Self {
            chords: vec![(KeyCode::Escape, Modifiers::NONE)],
        }
    }

    /// A binding that never fires.
    #[must_use]
    pub fn none() -> Self {
        Self { chords: Vec::new() }
    }

    /// Add another chord.
    #[must_use]
    pub fn with_chord(mut self, code: KeyCode, modifiers: Modifiers) -> Self {
        if !self.chords.contains(&(code, modifiers)) {
            self.chords.push((code, modifiers));
        }
        self
    }

    /// Whether `key` produces the cancellation signal.
    #[must_use]
    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.is_press()
            && self
                .chords
                .iter()
                .any(|&(code, modifiers)| key.code == code && key.modifiers == modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyEventKind;

    #[test]
    fn default_is_plain_escape_press() {
        let binding = CancelBinding::default();
        assert!(binding.matches(&KeyEvent::new(KeyCode::Escape)));
        assert!(!binding.matches(&KeyEvent::new(KeyCode::Enter)));
    }

    #[test]
    fn repeat_and_release_do_not_cancel() {
        let binding = CancelBinding::default();
        let esc = KeyEvent::new(KeyCode::Escape);
        assert!(!binding.matches(&esc.with_kind(KeyEventKind::Repeat)));
        assert!(!binding.matches(&esc.with_kind(KeyEventKind::Release)));
    }

    #[test]
    fn modifiers_must_match_exactly() {
        let binding = CancelBinding::default();
        let shifted = KeyEvent::new(KeyCode::Escape).with_modifiers(Modifiers::SHIFT);
        assert!(!binding.matches(&shifted));
    }

    #[test]
    fn extra_chord() {
        let binding = CancelBinding::escape().with_chord(KeyCode::Char('g'), Modifiers::CTRL);
        let ctrl_g = KeyEvent::new(KeyCode::Char('g')).with_modifiers(Modifiers::CTRL);
        assert!(binding.matches(&ctrl_g));
        assert!(binding.matches(&KeyEvent::new(KeyCode::Escape)));
    }

    #[test]
    fn none_never_matches() {
        assert!(!CancelBinding::none().matches(&KeyEvent::new(KeyCode::Escape)));
    }
}
