#![forbid(unsafe_code)]

//! Core: canonical input events, host locations, the cancellation binding and
//! single-threaded signal hubs used by the overlay layer.

pub mod cancel;
pub mod event;
pub mod location;
pub mod signal;

pub use cancel::{CancelBinding, CancelSignal};
pub use event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use location::{Location, LocationChange, LocationTracker};
pub use signal::{SignalHub, SubId, Subscription};
