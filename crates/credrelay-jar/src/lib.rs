//! # Credrelay Jar
//!
//! Read access to browser-style credential jars.
//!
//! The [`CredentialJar`] trait abstracts over where credentials live; the
//! accessor ([`fetch_bundle`]) turns per-domain queries into one
//! deduplicated [`CredentialBundle`](credrelay_core::CredentialBundle) per
//! platform. Backends:
//!
//! - [`MemoryJar`] - in-memory jar that also publishes change events, for
//!   tests and watcher wiring
//! - [`SqliteJar`] - read-only view over a Chromium-format `Cookies`
//!   database

pub mod accessor;
pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;

pub use accessor::fetch_bundle;
pub use error::{JarError, Result};
pub use memory::MemoryJar;
pub use sqlite::SqliteJar;
pub use traits::{CredentialChange, CredentialJar};
