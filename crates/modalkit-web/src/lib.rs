//! Browser host for `modalkit-core`.
//!
//! On `wasm32` this crate exports a `ModalWindow` class to JavaScript that
//! binds a [`modalkit_core::ModalController`] to the live document through
//! [`WebDom`]. Option parsing lives in [`config`] and builds on every target.
//!
//! # Features
//!
//! - `console-log`: `initLogging(level)` routes `tracing` output to the
//!   browser console.

pub mod config;

#[cfg(all(target_arch = "wasm32", feature = "console-log"))]
pub mod console;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
mod window;

pub use config::overrides_from_json;
#[cfg(target_arch = "wasm32")]
pub use dom::WebDom;
#[cfg(target_arch = "wasm32")]
pub use window::ModalWindow;
