//! Change watcher: debounce-by-relevance resync on live jar mutations.
//!
//! High-frequency credential churn is filtered out before paying the cost
//! of a full resync: removals are ignored (a removed required credential
//! means re-authentication is needed anyway), domains outside every
//! platform's patterns are ignored, and names outside the matched
//! platform's required set are ignored. Only then does the watcher re-run
//! the full fetch/check/deliver/record sequence.

use std::sync::Arc;

use tokio::sync::broadcast;

use credrelay_core::PlatformId;
use credrelay_jar::CredentialChange;

use crate::kernel::{Relay, SyncOutcome};

/// Long-lived observer over the jar's change events.
pub struct ChangeWatcher {
    relay: Arc<Relay>,
}

impl ChangeWatcher {
    /// Create a watcher driving the given relay.
    pub fn new(relay: Arc<Relay>) -> Self {
        Self { relay }
    }

    /// Decide whether one change event warrants a resync, and run it.
    ///
    /// Returns the synced platform and its outcome, or `None` when the
    /// event was filtered out.
    pub async fn handle_change(
        &self,
        change: &CredentialChange,
    ) -> Option<(PlatformId, SyncOutcome)> {
        if change.removed {
            return None;
        }

        let config = self.relay.registry().classify_domain(&change.record.domain)?;
        if !config.requires_name(&change.record.name) {
            return None;
        }

        tracing::debug!(
            platform = %config.id,
            name = %change.record.name,
            "required credential changed, resyncing"
        );
        let platform = config.id.clone();
        let outcome = self.relay.sync_one(&platform).await;
        Some((platform, outcome))
    }

    /// Run until the change channel closes.
    ///
    /// Lagged receivers are logged and skipped; the watcher never panics
    /// out of its loop.
    pub async fn run(self, mut changes: broadcast::Receiver<CredentialChange>) {
        loop {
            match changes.recv().await {
                Ok(change) => {
                    self.handle_change(&change).await;
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "credential change stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::debug!("credential change stream closed, watcher stopping");
    }
}
