//! Read-only jar backed by a Chromium-format `Cookies` database.
//!
//! Chromium persists cookies in a SQLite table `cookies` with `host_key`,
//! `name`, and `value` columns (see `net/extras/sqlite` in the Chromium
//! tree). This backend reads the plaintext `value` column, which is what
//! exported or unencrypted jars carry; OS-keychain decryption of
//! `encrypted_value` is out of scope.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OpenFlags};

use credrelay_core::{CredentialRecord, DomainPattern};

use crate::error::{JarError, Result};
use crate::traits::CredentialJar;

/// SQLite-backed jar over a Chromium-format cookie database.
///
/// Thread-safe via internal Mutex; queries run on the blocking pool.
pub struct SqliteJar {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteJar {
    /// Open a cookie database read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl CredentialJar for SqliteJar {
    async fn credentials_for_domain(
        &self,
        pattern: &DomainPattern,
    ) -> Result<Vec<CredentialRecord>> {
        let conn = self.conn.clone();
        let pattern = pattern.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| JarError::Backend(format!("mutex poisoned: {e}")))?;

            // Narrow with LIKE in SQL, then apply the exact suffix match in
            // Rust ("%qq.com" would also hit "notqq.com").
            let needle = format!("%{}", pattern.as_str().trim_start_matches('.'));
            let mut stmt = conn.prepare(
                "SELECT host_key, name, value FROM cookies
                 WHERE host_key LIKE ?1
                 ORDER BY host_key, name",
            )?;
            let rows = stmt.query_map(params![needle], |row| {
                let host: String = row.get(0)?;
                let name: String = row.get(1)?;
                let value: String = row.get(2)?;
                Ok(CredentialRecord::new(name, value, host))
            })?;

            let mut records = Vec::new();
            for row in rows {
                let record = row?;
                if pattern.matches(&record.domain) {
                    records.push(record);
                }
            }
            Ok(records)
        })
        .await
        .map_err(|e| JarError::Backend(format!("jar query task failed: {e}")))?
    }
}
