//! The Relay: sync orchestration over jar, filter, transport, and state.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use credrelay_core::{Channel, PendingExport, PlatformId, PlatformRegistry, SyncRecord};
use credrelay_jar::{fetch_bundle, CredentialJar};
use credrelay_store::{StateStore, StoreError};
use credrelay_transport::{HostTransport, TransportSelector};

use crate::error::SyncFailure;

/// Configuration for the relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Pause inserted between platforms during a batch sync, to avoid
    /// overlapping jar queries and flooding the primary transport.
    pub batch_pause: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            batch_pause: Duration::from_millis(100),
        }
    }
}

/// Result of one platform's sync attempt, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_count: Option<usize>,
}

impl SyncOutcome {
    fn succeeded(channel: Channel, credential_count: usize) -> Self {
        Self {
            success: true,
            error: None,
            channel: Some(channel),
            credential_count: Some(credential_count),
        }
    }

    fn failed(failure: &SyncFailure) -> Self {
        Self {
            success: false,
            error: Some(failure.to_string()),
            channel: None,
            credential_count: None,
        }
    }
}

/// The sync orchestrator.
///
/// Holds the immutable platform registry plus the jar, state store, and
/// primary transport it coordinates. One logical sync proceeds at a time
/// per invocation chain; `sync_all` deliberately serializes platforms.
pub struct Relay {
    registry: PlatformRegistry,
    jar: Arc<dyn CredentialJar>,
    store: Arc<dyn StateStore>,
    selector: TransportSelector,
    config: RelayConfig,
}

impl Relay {
    /// Create a relay over the given components.
    pub fn new(
        registry: PlatformRegistry,
        jar: Arc<dyn CredentialJar>,
        store: Arc<dyn StateStore>,
        transport: Arc<dyn HostTransport>,
        config: RelayConfig,
    ) -> Self {
        let selector = TransportSelector::new(transport, Arc::clone(&store));
        Self {
            registry,
            jar,
            store,
            selector,
            config,
        }
    }

    /// The configured platform table.
    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    /// The state store backing sync records and pending exports.
    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    /// Sync one platform end to end.
    ///
    /// Never returns an error: every failure path resolves to a reported
    /// outcome, and once a usable bundle exists the payload reaches some
    /// durable destination (primary or fallback) unless the fallback write
    /// itself fails.
    pub async fn sync_one(&self, platform: &PlatformId) -> SyncOutcome {
        match self.try_sync(platform).await {
            Ok(outcome) => outcome,
            Err(failure) => {
                tracing::warn!(platform = %platform, "sync failed: {failure}");
                SyncOutcome::failed(&failure)
            }
        }
    }

    async fn try_sync(&self, platform: &PlatformId) -> Result<SyncOutcome, SyncFailure> {
        // An unconfigured platform yields no credentials by definition.
        let Some(config) = self.registry.get(platform) else {
            return Err(SyncFailure::NoCredentials);
        };

        let bundle = fetch_bundle(self.jar.as_ref(), config).await;
        if bundle.is_empty() {
            return Err(SyncFailure::NoCredentials);
        }
        if !bundle.is_sufficient(config) {
            return Err(SyncFailure::IncompleteCredentials);
        }

        let cookie = bundle.to_cookie_string();
        let now = Utc::now();
        let delivery = self.selector.deliver(platform, &cookie, now).await?;

        self.store
            .record_sync(&SyncRecord {
                platform: platform.clone(),
                channel: delivery.channel,
                payload_len: cookie.len(),
                synced_at: now,
            })
            .await?;

        tracing::debug!(
            platform = %platform,
            channel = %delivery.channel,
            credentials = bundle.len(),
            "sync completed"
        );
        Ok(SyncOutcome::succeeded(delivery.channel, bundle.len()))
    }

    /// Sync every configured platform in registry order.
    ///
    /// Platforms are visited sequentially with a mandatory pause between
    /// them; partial failures never abort the batch.
    pub async fn sync_all(&self) -> BTreeMap<PlatformId, SyncOutcome> {
        let mut results = BTreeMap::new();
        for (index, config) in self.registry.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.config.batch_pause).await;
            }
            let outcome = self.sync_one(&config.id).await;
            results.insert(config.id.clone(), outcome);
        }
        results
    }

    /// The platform's current serialized cookie string and record count,
    /// without syncing. `None` for unconfigured platforms or empty jars.
    pub async fn cookie_string(&self, platform: &PlatformId) -> Option<(String, usize)> {
        let config = self.registry.get(platform)?;
        let bundle = fetch_bundle(self.jar.as_ref(), config).await;
        if bundle.is_empty() {
            return None;
        }
        Some((bundle.to_cookie_string(), bundle.len()))
    }

    /// Latest sync record per platform.
    pub async fn sync_status(&self) -> Result<BTreeMap<PlatformId, SyncRecord>, StoreError> {
        self.store.sync_status().await
    }

    /// All unconsumed fallback payloads.
    pub async fn pending_exports(&self) -> Result<BTreeMap<PlatformId, PendingExport>, StoreError> {
        self.store.pending_exports().await
    }
}
