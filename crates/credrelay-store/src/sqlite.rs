//! SQLite implementation of the StateStore trait.
//!
//! The primary storage backend. Uses rusqlite with bundled SQLite, wrapped
//! in async via tokio::spawn_blocking.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use credrelay_core::{Channel, PendingExport, PlatformId, SyncRecord};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::StateStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking to
/// avoid blocking the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database. Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking closure against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::InvalidData(format!("mutex poisoned: {e}")))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::InvalidData(format!("store task failed: {e}")))?
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidData(format!("bad timestamp {raw:?}: {e}")))
}

fn parse_channel(raw: &str) -> Result<Channel> {
    Channel::from_str_opt(raw)
        .ok_or_else(|| StoreError::InvalidData(format!("bad channel {raw:?}")))
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn record_sync(&self, record: &SyncRecord) -> Result<()> {
        let record = record.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO sync_records (platform, channel, payload_len, synced_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(platform) DO UPDATE SET
                     channel = excluded.channel,
                     payload_len = excluded.payload_len,
                     synced_at = excluded.synced_at",
                params![
                    record.platform.as_str(),
                    record.channel.as_str(),
                    record.payload_len as i64,
                    record.synced_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn sync_status(&self) -> Result<BTreeMap<PlatformId, SyncRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT platform, channel, payload_len, synced_at FROM sync_records",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?;

            let mut status = BTreeMap::new();
            for row in rows {
                let (platform, channel, payload_len, synced_at) = row?;
                let platform = PlatformId::new(platform);
                status.insert(
                    platform.clone(),
                    SyncRecord {
                        platform,
                        channel: parse_channel(&channel)?,
                        payload_len: payload_len as usize,
                        synced_at: parse_timestamp(&synced_at)?,
                    },
                );
            }
            Ok(status)
        })
        .await
    }

    async fn put_pending(&self, pending: &PendingExport) -> Result<()> {
        let pending = pending.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO pending_exports (platform, cookie, saved_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(platform) DO UPDATE SET
                     cookie = excluded.cookie,
                     saved_at = excluded.saved_at",
                params![
                    pending.platform.as_str(),
                    pending.cookie,
                    pending.saved_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn pending_exports(&self) -> Result<BTreeMap<PlatformId, PendingExport>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT platform, cookie, saved_at FROM pending_exports")?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?;

            let mut pending = BTreeMap::new();
            for row in rows {
                let (platform, cookie, saved_at) = row?;
                let platform = PlatformId::new(platform);
                pending.insert(
                    platform.clone(),
                    PendingExport {
                        platform,
                        cookie,
                        saved_at: parse_timestamp(&saved_at)?,
                    },
                );
            }
            Ok(pending)
        })
        .await
    }

    async fn remove_pending(&self, platform: &PlatformId) -> Result<Option<PendingExport>> {
        let platform = platform.clone();
        self.with_conn(move |conn| {
            let existing = conn
                .query_row(
                    "SELECT cookie, saved_at FROM pending_exports WHERE platform = ?1",
                    params![platform.as_str()],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                )
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(StoreError::Database(other)),
                })?;

            let Some((cookie, saved_at)) = existing else {
                return Ok(None);
            };

            conn.execute(
                "DELETE FROM pending_exports WHERE platform = ?1",
                params![platform.as_str()],
            )?;

            Ok(Some(PendingExport {
                platform,
                cookie,
                saved_at: parse_timestamp(&saved_at)?,
            }))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(platform: &str, channel: Channel, payload_len: usize) -> SyncRecord {
        SyncRecord {
            platform: PlatformId::new(platform),
            channel,
            payload_len,
            synced_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_sqlite_record_sync_upserts() {
        let store = SqliteStore::open_memory().unwrap();
        store
            .record_sync(&record("douyin", Channel::Primary, 10))
            .await
            .unwrap();
        store
            .record_sync(&record("douyin", Channel::Fallback, 99))
            .await
            .unwrap();

        let status = store.sync_status().await.unwrap();
        assert_eq!(status.len(), 1);
        let douyin = &status[&PlatformId::new("douyin")];
        assert_eq!(douyin.channel, Channel::Fallback);
        assert_eq!(douyin.payload_len, 99);
    }

    #[tokio::test]
    async fn test_sqlite_pending_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        let platform = PlatformId::new("shipinhao");
        let pending = PendingExport {
            platform: platform.clone(),
            cookie: "uin=1; skey=2".to_string(),
            saved_at: "2024-05-01T10:00:00Z".parse().unwrap(),
        };

        store.put_pending(&pending).await.unwrap();
        let all = store.pending_exports().await.unwrap();
        assert_eq!(all[&platform], pending);

        let taken = store.remove_pending(&platform).await.unwrap().unwrap();
        assert_eq!(taken, pending);
        assert!(store.pending_exports().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .record_sync(&record("xiaohongshu", Channel::Primary, 7))
                .await
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let status = store.sync_status().await.unwrap();
        assert_eq!(status[&PlatformId::new("xiaohongshu")].payload_len, 7);
    }
}
