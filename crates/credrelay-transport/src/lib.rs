//! # Credrelay Transport
//!
//! Delivery machinery for credential payloads: the native-messaging
//! primary channel and the persisted fallback queue.
//!
//! ## Overview
//!
//! The [`HostTransport`] trait is a single awaited round trip to an
//! external receiver. [`TransportSelector`] tries the primary transport
//! first and falls back unconditionally to persisting a
//! [`PendingExport`](credrelay_core::PendingExport); from the caller's
//! point of view, delivery to *some* durable destination always succeeds
//! once a usable payload exists. The only hard error is the fallback write
//! itself failing.
//!
//! ## Wire Format
//!
//! ```text
//! Extension                           Native host
//!   |-- [len u32 LE][JSON request] ---->|
//!   |<--- [len u32 LE][JSON response] --|
//! ```
//!
//! Requests are `action`-tagged JSON (`updateCookie`, `ping`,
//! `getConfig`); responses carry a boolean `success` field. See
//! [`messages`] and [`framing`].

pub mod error;
pub mod framing;
pub mod messages;
pub mod native;
pub mod selector;
pub mod transport;

pub use error::{DeliveryError, TransportError};
pub use framing::{read_frame, write_frame, MAX_FRAME_LEN};
pub use messages::{HostRequest, HostResponse};
pub use native::{HostCommand, NativeHostTransport};
pub use selector::{Delivery, TransportSelector};
pub use transport::{memory::HostBehavior, memory::MemoryHost, HostTransport};
