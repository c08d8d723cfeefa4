//! # Credrelay Core
//!
//! Pure primitives for the credrelay kernel: platform configuration,
//! credential records and bundles, and sync metadata.
//!
//! This crate contains no I/O, no storage, no process spawning. It is pure
//! computation over credential data.
//!
//! ## Key Types
//!
//! - [`PlatformId`] - Identifier for a configured platform
//! - [`PlatformRegistry`] - Immutable per-platform configuration table
//! - [`CredentialBundle`] - Ordered, deduplicated credential snapshot
//! - [`SyncRecord`] / [`PendingExport`] - Persisted sync metadata and
//!   fallback payloads
//!
//! ## Serialization
//!
//! A bundle renders to a cookie string (`name=value` pairs joined by
//! `"; "`) deterministically. See [`credential`].

pub mod config;
pub mod credential;
pub mod sync;
pub mod types;

pub use config::{
    DomainPattern, PlatformConfig, PlatformRegistry, SufficiencyPolicy, DEFAULT_SUFFICIENCY,
};
pub use credential::{parse_cookie_string, CredentialBundle, CredentialKey, CredentialRecord};
pub use sync::{Channel, PendingExport, SyncRecord};
pub use types::PlatformId;
