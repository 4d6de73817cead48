#![forbid(unsafe_code)]

//! Overlay (modal) orchestration for the wallet UI.
//!
//! # Key Components
//!
//! - [`overlay_set!`] - Declares the closed overlay registry and its typed payloads
//! - [`OverlayTable`] - Per-overlay open state with monotonic open stamps
//! - [`order`] - Topmost resolution and z-order allocation
//! - [`Overlays`] - The facade handle: open, close, close-all and queries
//! - [`CancellationRouter`] - Sends the cancel key to the topmost overlay
//! - [`NavigationTeardown`] - Closes everything on a location change
//! - [`OverlaySession`] - Owning scope wiring all of the above to host events
//!
//! # Role in the workspace
//! Overlay content, rendering and business logic live elsewhere. This crate
//! only decides which overlays are open, in which order, and how they get
//! dismissed. Collaborators receive an [`Attached`] payload whose
//! [`CloseHandle`] lets them dismiss themselves.

pub mod config;
pub mod error;
pub mod key;
pub mod order;
pub mod overlays;
pub mod router;
pub mod session;
pub mod table;
pub mod teardown;

pub use config::OverlayConfig;
pub use error::{ConfigError, OverlayError};
pub use key::{OverlayKey, OverlayPayload};
pub use order::ZLayering;
pub use overlays::{
    Attached, CancelOutcome, CloseHandle, OpenOptions, OverlayChange, Overlays, WeakOverlays,
};
pub use router::CancellationRouter;
pub use session::{Dispatch, OverlaySession};
pub use table::{OpenSeq, OverlayEntry, OverlayTable};
pub use teardown::NavigationTeardown;
