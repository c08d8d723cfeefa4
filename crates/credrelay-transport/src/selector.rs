//! Transport selection: primary first, persisted fallback otherwise.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use credrelay_core::{Channel, PendingExport, PlatformId};
use credrelay_store::StateStore;

use crate::error::DeliveryError;
use crate::messages::HostRequest;
use crate::transport::HostTransport;

/// Outcome of a delivery attempt that reached a durable destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// The channel that actually carried (or stored) the payload.
    pub channel: Channel,
}

/// Chooses between the primary transport and the persisted fallback queue.
pub struct TransportSelector {
    transport: Arc<dyn HostTransport>,
    store: Arc<dyn StateStore>,
}

impl TransportSelector {
    /// Create a selector over the given transport and fallback store.
    pub fn new(transport: Arc<dyn HostTransport>, store: Arc<dyn StateStore>) -> Self {
        Self { transport, store }
    }

    /// Deliver one platform's serialized credential payload.
    ///
    /// The primary channel succeeds only on an error-free round trip whose
    /// response sets `success`. Anything else (not installed, unreachable,
    /// explicit decline) is uniformly "primary unavailable" and falls back
    /// to persisting a pending export, overwriting any prior entry for the
    /// platform. The only error raised is the fallback write itself
    /// failing, at which point no durable copy of the payload exists.
    pub async fn deliver(
        &self,
        platform: &PlatformId,
        cookie: &str,
        at: DateTime<Utc>,
    ) -> Result<Delivery, DeliveryError> {
        let request = HostRequest::UpdateCookie {
            platform: platform.clone(),
            cookie: cookie.to_string(),
            timestamp: at,
        };

        match self.transport.roundtrip(&request).await {
            Ok(response) if response.success => {
                tracing::debug!(platform = %platform, "primary transport accepted payload");
                return Ok(Delivery {
                    channel: Channel::Primary,
                });
            }
            Ok(response) => {
                tracing::debug!(
                    platform = %platform,
                    reason = response.error.as_deref().unwrap_or("declined"),
                    "primary transport declined"
                );
            }
            Err(err) => {
                tracing::debug!(platform = %platform, "primary transport unavailable: {err}");
            }
        }

        let pending = PendingExport {
            platform: platform.clone(),
            cookie: cookie.to_string(),
            saved_at: at,
        };
        self.store.put_pending(&pending).await?;
        tracing::debug!(platform = %platform, "payload queued for manual export");

        Ok(Delivery {
            channel: Channel::Fallback,
        })
    }
}
