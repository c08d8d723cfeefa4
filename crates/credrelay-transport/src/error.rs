//! Error types for the transport module.

use thiserror::Error;

/// Errors that can occur on the primary transport.
///
/// Every variant collapses to "primary unavailable" at the selector; the
/// distinctions exist for logging, not for control flow.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The host process could not be started (e.g. not installed).
    #[error("failed to spawn host: {0}")]
    Spawn(#[source] std::io::Error),

    /// I/O error on the host channel.
    #[error("host I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame encoding/decoding failed.
    #[error("frame codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// A frame exceeded the native-messaging size cap.
    #[error("frame too large: {0} bytes")]
    FrameTooLarge(usize),

    /// The channel closed before a response arrived.
    #[error("host channel closed: {0}")]
    ChannelClosed(String),
}

/// Failure to reach any durable destination.
///
/// Raised only when the fallback write itself fails; at that point no
/// durable copy of the payload exists.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The fallback persistence failed.
    #[error("fallback storage write failed: {0}")]
    Storage(#[from] credrelay_store::StoreError),
}
