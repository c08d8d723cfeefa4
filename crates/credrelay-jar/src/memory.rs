//! In-memory implementation of the jar trait.
//!
//! Primarily for tests. Mutations are published on a broadcast channel so
//! a change watcher can be wired against it the same way it would be
//! against a live browser jar.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::broadcast;

use credrelay_core::{CredentialKey, CredentialRecord, DomainPattern};

use crate::error::Result;
use crate::traits::{CredentialChange, CredentialJar};

/// In-memory credential jar.
///
/// Records are keyed by `(name, domain)`; iteration order is the key
/// order, so queries over unchanged contents are deterministic.
pub struct MemoryJar {
    inner: RwLock<BTreeMap<CredentialKey, CredentialRecord>>,
    changes: broadcast::Sender<CredentialChange>,
}

impl MemoryJar {
    /// Create a new empty jar.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            inner: RwLock::new(BTreeMap::new()),
            changes,
        }
    }

    /// Subscribe to live jar mutations.
    pub fn subscribe(&self) -> broadcast::Receiver<CredentialChange> {
        self.changes.subscribe()
    }

    /// Insert or update a credential, publishing a change event.
    pub fn insert(&self, record: CredentialRecord) {
        self.inner
            .write()
            .unwrap()
            .insert(record.key(), record.clone());
        let _ = self.changes.send(CredentialChange {
            record,
            removed: false,
        });
    }

    /// Remove a credential, publishing a removal event if it existed.
    pub fn remove(&self, name: &str, domain: &str) {
        let key = CredentialKey {
            name: name.to_string(),
            domain: domain.to_string(),
        };
        let removed = self.inner.write().unwrap().remove(&key);
        if let Some(record) = removed {
            let _ = self.changes.send(CredentialChange {
                record,
                removed: true,
            });
        }
    }

    /// Number of credentials currently held.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    /// Whether the jar is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }
}

impl Default for MemoryJar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialJar for MemoryJar {
    async fn credentials_for_domain(
        &self,
        pattern: &DomainPattern,
    ) -> Result<Vec<CredentialRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .values()
            .filter(|r| pattern.matches(&r.domain))
            .cloned()
            .collect())
    }
}
