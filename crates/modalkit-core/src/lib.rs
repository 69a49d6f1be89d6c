#![forbid(unsafe_code)]

//! Host-independent modal window controller.
//!
//! A [`ModalController`] is bound to a set of trigger elements and a single
//! shared overlay. A trigger click resolves the panel it names, runs a
//! class-based CSS transition to show it, traps keyboard focus inside it and
//! locks page scrolling until the panel is closed again (close button,
//! overlay click, or Escape).
//!
//! The controller never touches a browser directly. Everything it does to
//! the page goes through the [`Dom`] trait, and everything it defers goes
//! into its own [`TimerQueue`]. A host (the `modalkit-web` crate in a
//! browser, or `modalkit-harness` in tests) feeds it [`ModalEvent`]s and
//! calls [`ModalController::tick`] when [`ModalController::next_deadline`]
//! is reached.
//!
//! # Example
//!
//! ```ignore
//! use modalkit_core::{ModalController, ModalEvent, ModalOverrides, VirtualClock};
//!
//! let clock = VirtualClock::new();
//! let mut modal = ModalController::new(dom, clock.clone(), "[data-modal]", ModalOverrides::default())?;
//!
//! modal.handle(ModalEvent::click(trigger));
//! clock.advance_ms(300);
//! modal.tick();
//! assert!(modal.is_open());
//! ```

pub mod busy;
pub mod clock;
pub mod controller;
pub mod dom;
pub mod error;
pub mod event;
pub mod focus;
pub mod options;
pub mod scroll;
pub mod timer;

pub use busy::BusyGuard;
pub use clock::{Clock, MonotonicClock, VirtualClock};
pub use controller::{Deferred, ModalController, ModalHooks, ModalPhase, ResolvedTarget};
pub use dom::Dom;
pub use error::ModalError;
pub use event::{EventOutcome, Key, ModalEvent};
pub use focus::{FOCUSABLE_SELECTOR, TabIndexSnapshot, TrapStep};
pub use options::{ModalOptions, ModalOverrides};
pub use scroll::ScrollLock;
pub use timer::{TimerId, TimerQueue};
