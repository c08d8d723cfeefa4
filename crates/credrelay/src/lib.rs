//! # Credrelay
//!
//! Credential synchronization kernel: discovers browser-held session
//! credentials per platform, filters them for sufficiency, delivers them
//! over a native-messaging primary channel with a persisted fallback
//! queue, and tracks sync state per platform.
//!
//! ## Overview
//!
//! ```text
//! watcher / manual trigger
//!          |
//!          v
//!       [Relay] --- fetch ---> CredentialJar
//!          |   \-- check ----> sufficiency policy
//!          |   \-- deliver --> primary transport -> fallback queue
//!          |   \-- record ---> StateStore
//!          v
//!      SyncOutcome (per platform)
//! ```
//!
//! ## Key Properties
//!
//! - **Per-platform isolation**: one platform's failure never aborts a
//!   batch; every platform reports its own outcome.
//! - **Durable delivery**: once a usable bundle exists, the payload always
//!   reaches some durable destination; only a fallback-store write failure
//!   is a hard sync failure.
//! - **Upsert-by-key state**: sync records and pending exports are
//!   replaced whole, so interleaved syncs cannot tear a record.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use credrelay::{Relay, RelayConfig};
//! use credrelay_core::{PlatformId, PlatformRegistry};
//! use credrelay_jar::MemoryJar;
//! use credrelay_store::MemoryStore;
//! use credrelay_transport::{HostCommand, NativeHostTransport};
//!
//! # async fn example() {
//! let relay = Relay::new(
//!     PlatformRegistry::builtin(),
//!     Arc::new(MemoryJar::new()),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(NativeHostTransport::new(HostCommand::new(
//!         "/usr/local/bin/credrelay-host",
//!     ))),
//!     RelayConfig::default(),
//! );
//!
//! let outcome = relay.sync_one(&PlatformId::new("douyin")).await;
//! println!("synced via {:?}", outcome.channel);
//! # }
//! ```

pub mod commands;
pub mod error;
pub mod export;
pub mod kernel;
pub mod watcher;

pub use commands::{dispatch, Command, CookieStringResponse, Response};
pub use error::SyncFailure;
pub use export::{write_export, ExportEntry, ExportError, ExportSettings, ExportedConfig};
pub use kernel::{Relay, RelayConfig, SyncOutcome};
pub use watcher::ChangeWatcher;
