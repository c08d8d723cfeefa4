//! Exported credential bundle file: the hand-off artifact for the
//! downstream collector.
//!
//! The file is a JSON object keyed by platform, each entry carrying the
//! serialized cookie plus an update timestamp and an expiry hint, followed
//! by a `settings` block. Live jar contents take precedence; platforms
//! whose jar is currently empty fall back to their pending payload, and a
//! pending payload folded into the export is consumed.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use credrelay_core::PlatformId;
use credrelay_store::StoreError;

use crate::kernel::Relay;

/// One platform's entry in the exported config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub enabled: bool,
    pub cookie: String,
    pub cookie_updated_at: DateTime<Utc>,
    pub cookie_expires_hint: u32,
}

/// Collector notification switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub macos: bool,
}

/// Collector settings carried alongside the credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub works_limit: u32,
    pub auto_push_to_github: bool,
    pub notifications: NotificationSettings,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            works_limit: 50,
            auto_push_to_github: false,
            notifications: NotificationSettings { macos: true },
        }
    }
}

/// The full exported config: platform entries plus settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedConfig {
    #[serde(flatten)]
    pub platforms: BTreeMap<PlatformId, ExportEntry>,
    pub settings: ExportSettings,
}

/// Errors that can occur while producing the export file.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Reading or consuming store state failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Writing the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the config failed.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Build the export file and write it pretty-printed to `path`.
///
/// Pending payloads folded into the file (used only for platforms whose
/// jar is currently empty) are consumed after a successful write. Returns
/// the written config.
pub async fn write_export(relay: &Relay, path: impl AsRef<Path>) -> Result<ExportedConfig, ExportError> {
    let now = Utc::now();
    let pending = relay.store().pending_exports().await?;

    let mut platforms = BTreeMap::new();
    let mut consumed = Vec::new();

    for config in relay.registry().iter() {
        let entry = match relay.cookie_string(&config.id).await {
            Some((cookie, _count)) => Some((cookie, now)),
            None => pending.get(&config.id).map(|p| {
                consumed.push(config.id.clone());
                (p.cookie.clone(), p.saved_at)
            }),
        };

        if let Some((cookie, updated_at)) = entry {
            platforms.insert(
                config.id.clone(),
                ExportEntry {
                    enabled: true,
                    cookie,
                    cookie_updated_at: updated_at,
                    cookie_expires_hint: config.expires_hint_days,
                },
            );
        }
    }

    let exported = ExportedConfig {
        platforms,
        settings: ExportSettings::default(),
    };

    let json = serde_json::to_string_pretty(&exported)?;
    tokio::fs::write(path.as_ref(), json).await?;
    tracing::debug!(
        path = %path.as_ref().display(),
        platforms = exported.platforms.len(),
        "export written"
    );

    for platform in consumed {
        relay.store().remove_pending(&platform).await?;
    }

    Ok(exported)
}
