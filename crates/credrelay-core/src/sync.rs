//! Sync metadata: which channel carried a sync, when, and what is still
//! waiting for manual export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::PlatformId;

/// Which channel actually carried a completed sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// The external native-messaging receiver accepted the payload.
    Primary,
    /// The payload was persisted to the local fallback queue.
    Fallback,
}

impl Channel {
    /// Stable text form, used for storage columns.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Primary => "primary",
            Channel::Fallback => "fallback",
        }
    }

    /// Parse the stable text form.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "primary" => Some(Channel::Primary),
            "fallback" => Some(Channel::Fallback),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for the most recent completed sync of one platform.
///
/// Upserted on every completed sync attempt; at most one record per
/// platform exists at any time (last write wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    pub platform: PlatformId,
    pub channel: Channel,
    pub payload_len: usize,
    pub synced_at: DateTime<Utc>,
}

/// A fallback payload waiting for the user to export it manually.
///
/// Keyed by platform and overwritten on each fallback sync; present only
/// while the payload is unconsumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingExport {
    pub platform: PlatformId,
    pub cookie: String,
    pub saved_at: DateTime<Utc>,
}
