//! Error types for the kernel.

use thiserror::Error;

use credrelay_store::StoreError;
use credrelay_transport::DeliveryError;

/// Why a sync attempt for one platform did not complete.
///
/// Rendered into [`SyncOutcome::error`](crate::SyncOutcome) strings; never
/// propagated across the command surface.
#[derive(Debug, Error)]
pub enum SyncFailure {
    /// The jar held no credentials for the platform (or the platform is
    /// not configured at all).
    #[error("no cookies found, please log in")]
    NoCredentials,

    /// Too few of the platform's required credential names were present.
    #[error("cookies incomplete, please log in again")]
    IncompleteCredentials,

    /// Neither the primary transport nor the fallback store took the
    /// payload.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Recording sync metadata failed.
    #[error("sync state write failed: {0}")]
    Storage(#[from] StoreError),
}
