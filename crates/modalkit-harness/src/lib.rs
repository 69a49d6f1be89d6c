#![forbid(unsafe_code)]

//! Test harness for `modalkit-core`.
//!
//! - [`FakeDocument`]: in-memory element tree implementing [`modalkit_core::Dom`]
//! - [`Page`]: the reference markup every integration test runs against
//! - [`Harness`]: a controller bound to a `Page` with a [`modalkit_core::VirtualClock`]
//!
//! Set `RUST_LOG=modalkit_core=trace` to see every deferred step while a test
//! runs (after calling [`init_tracing`]).

pub mod document;
pub mod fixture;
pub mod harness;
pub mod selector;

pub use document::{FakeDocument, NodeId};
pub use fixture::{Page, TRIGGER_SELECTOR};
pub use harness::{Harness, HarnessBuilder, TestHooks, TestModal};

/// Install a test-friendly `tracing` subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
