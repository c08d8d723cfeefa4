//! In-memory implementation of the StateStore trait.
//!
//! Same semantics as SQLite, no persistence. Thread-safe via RwLock.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use credrelay_core::{PendingExport, PlatformId, SyncRecord};

use crate::error::Result;
use crate::traits::StateStore;

/// In-memory store implementation.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    syncs: BTreeMap<PlatformId, SyncRecord>,
    pending: BTreeMap<PlatformId, PendingExport>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn record_sync(&self, record: &SyncRecord) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.syncs.insert(record.platform.clone(), record.clone());
        Ok(())
    }

    async fn sync_status(&self) -> Result<BTreeMap<PlatformId, SyncRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.syncs.clone())
    }

    async fn put_pending(&self, pending: &PendingExport) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner
            .pending
            .insert(pending.platform.clone(), pending.clone());
        Ok(())
    }

    async fn pending_exports(&self) -> Result<BTreeMap<PlatformId, PendingExport>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.pending.clone())
    }

    async fn remove_pending(&self, platform: &PlatformId) -> Result<Option<PendingExport>> {
        let mut inner = self.inner.write().unwrap();
        Ok(inner.pending.remove(platform))
    }
}
