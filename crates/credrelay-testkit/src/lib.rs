//! # Credrelay Testkit
//!
//! Shared fixtures and proptest generators for credrelay tests.
//!
//! [`TestFixture`] wires a [`Relay`](credrelay::Relay) against in-memory
//! backends (jar, store, host) so integration tests can script jar
//! contents and host behavior and observe every transport call.

pub mod fixtures;
pub mod generators;

pub use fixtures::TestFixture;

/// Install a test-friendly tracing subscriber, once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
