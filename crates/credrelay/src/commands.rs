//! Typed command dispatch for the inbound command surface.
//!
//! Each command has a declared input/output shape; the wire form keeps the
//! original `action`-tagged JSON so existing callers keep working. Every
//! command resolves to a response value, even on internal failure; nothing
//! here returns an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use credrelay_core::{PendingExport, PlatformId, SyncRecord};

use crate::kernel::{Relay, SyncOutcome};

/// Inbound commands, tagged by `action` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    /// Sync one platform now.
    SyncCookie { platform: PlatformId },
    /// Sync every configured platform.
    SyncAllCookies,
    /// Read the platform's current cookie string without syncing.
    GetCookieString { platform: PlatformId },
    /// Latest sync record per platform.
    GetSyncStatus,
    /// All unconsumed fallback payloads.
    GetPendingCookies,
}

/// Response for [`Command::GetCookieString`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieStringResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Responses, one variant per command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Outcome(SyncOutcome),
    Outcomes(BTreeMap<PlatformId, SyncOutcome>),
    CookieString(CookieStringResponse),
    Status(BTreeMap<PlatformId, SyncRecord>),
    Pending(BTreeMap<PlatformId, PendingExport>),
}

/// Execute one command against the relay.
pub async fn dispatch(relay: &Relay, command: Command) -> Response {
    match command {
        Command::SyncCookie { platform } => Response::Outcome(relay.sync_one(&platform).await),

        Command::SyncAllCookies => Response::Outcomes(relay.sync_all().await),

        Command::GetCookieString { platform } => {
            let response = match relay.cookie_string(&platform).await {
                Some((cookie, count)) => CookieStringResponse {
                    success: true,
                    cookie: Some(cookie),
                    count: Some(count),
                    error: None,
                },
                None => CookieStringResponse {
                    success: false,
                    cookie: None,
                    count: None,
                    error: Some("no cookies found".to_string()),
                },
            };
            Response::CookieString(response)
        }

        Command::GetSyncStatus => {
            let status = relay.sync_status().await.unwrap_or_else(|err| {
                tracing::warn!("sync status read failed: {err}");
                BTreeMap::new()
            });
            Response::Status(status)
        }

        Command::GetPendingCookies => {
            let pending = relay.pending_exports().await.unwrap_or_else(|err| {
                tracing::warn!("pending exports read failed: {err}");
                BTreeMap::new()
            });
            Response::Pending(pending)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_shape() {
        let command: Command =
            serde_json::from_str(r#"{"action":"syncCookie","platform":"douyin"}"#).unwrap();
        assert_eq!(
            command,
            Command::SyncCookie {
                platform: PlatformId::new("douyin")
            }
        );

        let command: Command = serde_json::from_str(r#"{"action":"syncAllCookies"}"#).unwrap();
        assert_eq!(command, Command::SyncAllCookies);

        let json = serde_json::to_value(&Command::GetPendingCookies).unwrap();
        assert_eq!(json["action"], "getPendingCookies");
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result: Result<Command, _> =
            serde_json::from_str(r#"{"action":"dropTables"}"#);
        assert!(result.is_err());
    }
}
