//! Native messaging wire types.
//!
//! Requests are tagged by an `action` field, matching what the host
//! dispatches on. Timestamps cross the wire as RFC 3339 strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use credrelay_core::PlatformId;

/// Outbound request to the native host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HostRequest {
    /// Push one platform's serialized credential payload.
    UpdateCookie {
        platform: PlatformId,
        cookie: String,
        timestamp: DateTime<Utc>,
    },
    /// Health probe; a live host answers with `success: true`.
    Ping,
    /// Ask the host which platforms it has configured.
    GetConfig,
}

/// Response from the native host.
///
/// `success` is the acceptance criterion; `message` and `error` carry
/// human-readable detail and are not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HostResponse {
    /// An accepting response.
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    /// A declining response.
    pub fn declined(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}
