//! Store trait: the abstract interface for sync-state persistence.
//!
//! This trait keeps the orchestrator storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::collections::BTreeMap;

use async_trait::async_trait;
use credrelay_core::{PendingExport, PlatformId, SyncRecord};

use crate::error::Result;

/// The StateStore trait: async interface for sync-state persistence.
///
/// # Design Notes
///
/// - **Upsert-by-key**: both tables are keyed by platform; writes replace
///   the full record, so at most one row per platform exists and
///   concurrent writers cannot leave a torn record.
/// - **No business logic**: sufficiency, transport selection, and batch
///   sequencing all live above this layer.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Upsert the platform's sync record (last write wins).
    async fn record_sync(&self, record: &SyncRecord) -> Result<()>;

    /// The latest sync record for every platform that has one.
    async fn sync_status(&self) -> Result<BTreeMap<PlatformId, SyncRecord>>;

    /// Upsert a fallback payload for the platform, overwriting any prior
    /// pending entry.
    async fn put_pending(&self, pending: &PendingExport) -> Result<()>;

    /// All unconsumed fallback payloads, keyed by platform.
    async fn pending_exports(&self) -> Result<BTreeMap<PlatformId, PendingExport>>;

    /// Consume the platform's fallback payload, returning it if present.
    async fn remove_pending(&self, platform: &PlatformId) -> Result<Option<PendingExport>>;
}
