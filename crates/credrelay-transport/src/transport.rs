//! Transport trait for the primary channel.
//!
//! A transport is one awaited request/response round trip; there is no
//! session state and no keep-alive signaling.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::messages::{HostRequest, HostResponse};

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// The primary delivery channel to an external, out-of-process receiver.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait HostTransport: Send + Sync {
    /// Send one request and await the host's response.
    async fn roundtrip(&self, request: &HostRequest) -> Result<HostResponse>;

    /// Probe the host with a `ping` action.
    async fn ping(&self) -> Result<bool> {
        Ok(self.roundtrip(&HostRequest::Ping).await?.success)
    }
}

/// A simple in-memory host for testing.
///
/// Answers according to scripted behavior and records every request it
/// receives, so tests can assert which transport calls fired.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use credrelay_core::PlatformId;

    /// Scripted behavior for the in-memory host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum HostBehavior {
        /// Answer `success: true`.
        Accept,
        /// Answer `success: false` with an error message.
        Decline,
        /// Fail the round trip as if the host were not installed.
        Unreachable,
    }

    /// In-memory stand-in for the native host.
    pub struct MemoryHost {
        default_behavior: HostBehavior,
        overrides: Mutex<HashMap<PlatformId, HostBehavior>>,
        requests: Mutex<Vec<HostRequest>>,
    }

    impl MemoryHost {
        /// An accepting host.
        pub fn new() -> Self {
            Self::with_behavior(HostBehavior::Accept)
        }

        /// A host with the given default behavior.
        pub fn with_behavior(behavior: HostBehavior) -> Self {
            Self {
                default_behavior: behavior,
                overrides: Mutex::new(HashMap::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Override the behavior for one platform's `updateCookie` calls.
        pub fn set_behavior_for(&self, platform: PlatformId, behavior: HostBehavior) {
            self.overrides.lock().unwrap().insert(platform, behavior);
        }

        /// Every request received so far, in order.
        pub fn requests(&self) -> Vec<HostRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn behavior_for(&self, request: &HostRequest) -> HostBehavior {
            if let HostRequest::UpdateCookie { platform, .. } = request {
                if let Some(behavior) = self.overrides.lock().unwrap().get(platform) {
                    return *behavior;
                }
            }
            self.default_behavior
        }
    }

    impl Default for MemoryHost {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl HostTransport for MemoryHost {
        async fn roundtrip(&self, request: &HostRequest) -> Result<HostResponse> {
            self.requests.lock().unwrap().push(request.clone());
            match self.behavior_for(request) {
                HostBehavior::Accept => Ok(HostResponse::accepted("ok")),
                HostBehavior::Decline => {
                    Ok(HostResponse::declined("platform not configured on host"))
                }
                HostBehavior::Unreachable => Err(TransportError::ChannelClosed(
                    "host not installed".to_string(),
                )),
            }
        }
    }
}
