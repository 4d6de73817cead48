#![forbid(unsafe_code)]

//! The closed overlay registry.
//!
//! Every application declares its overlays once, at build time, as a
//! fieldless key enum plus a payload enum with one variant per key. The
//! payload variant decides which overlay opens, so a payload can never be
//! attached to the wrong overlay.
//!
//! [`overlay_set!`](crate::overlay_set) generates both enums and their trait
//! impls from a single declaration:
//!
//! ```
//! use wui_overlay::overlay_set;
//!
//! #[derive(Debug, Clone, Default)]
//! pub struct SendConfirm {
//!     pub amount: u64,
//! }
//!
//! overlay_set! {
//!     /// Wallet overlays.
//!     pub enum WalletOverlay;
//!     /// Data attached to a wallet overlay.
//!     pub enum WalletPayload {
//!         /// Confirm an outgoing transfer.
//!         SendConfirm(SendConfirm) = "send-confirm",
//!         /// Pick a token.
//!         TokenPicker(()) = "token-picker",
//!     }
//! }
//!
//! use wui_overlay::{OverlayKey, OverlayPayload};
//! assert_eq!(WalletOverlay::ALL.len(), 2);
//! assert_eq!(WalletPayload::TokenPicker(()).key(), WalletOverlay::TokenPicker);
//! assert_eq!(WalletOverlay::from_label("send-confirm").ok(), Some(WalletOverlay::SendConfirm));
//! ```

use std::fmt;
use std::hash::Hash;

use crate::error::OverlayError;

/// Identifier of one overlay in a closed set.
///
/// Implementations must keep `ALL[k.index()] == k` for every key; the
/// generated impls do.
pub trait OverlayKey: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Every key, in declaration order.
    const ALL: &'static [Self];

    /// Position of this key in [`Self::ALL`].
    fn index(self) -> usize;

    /// Stable, human-readable name.
    fn label(self) -> &'static str;

    /// Look a key up by its label.
    ///
    /// This is the only way an identifier outside the set can reach the
    /// overlay layer.
    fn from_label(label: &str) -> Result<Self, OverlayError> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.label() == label)
            .ok_or_else(|| OverlayError::UnknownOverlay(label.to_owned()))
    }
}

/// Data attached to an open overlay, tagged by overlay.
pub trait OverlayPayload: Clone + fmt::Debug + 'static {
    /// The key set this payload belongs to.
    type Key: OverlayKey;

    /// The overlay this payload opens.
    fn key(&self) -> Self::Key;

    /// Payload used when an overlay is opened without data.
    fn default_for(key: Self::Key) -> Self;
}

/// Declare an overlay key enum and its payload union.
///
/// Every payload type must implement `Debug`, `Clone` and `Default`. The
/// macro derives `Debug, Clone, Copy, PartialEq, Eq, Hash` on the key enum and
/// `Debug, Clone` on the payload enum; do not derive them again.
#[macro_export]
macro_rules! overlay_set {
    (
        $(#[$kmeta:meta])*
        $kvis:vis enum $key:ident;
        $(#[$pmeta:meta])*
        $pvis:vis enum $payload:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident ( $ty:ty ) = $label:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$kmeta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $kvis enum $key {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $crate::OverlayKey for $key {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn index(self) -> usize {
                self as usize
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        $(#[$pmeta])*
        #[derive(Debug, Clone)]
        $pvis enum $payload {
            $(
                $(#[$vmeta])*
                $variant($ty),
            )+
        }

        impl $crate::OverlayPayload for $payload {
            type Key = $key;

            fn key(&self) -> $key {
                match self {
                    $(Self::$variant(_) => $key::$variant,)+
                }
            }

            fn default_for(key: $key) -> Self {
                match key {
                    $($key::$variant => Self::$variant(<$ty as ::core::default::Default>::default()),)+
                }
            }
        }
    };
}
