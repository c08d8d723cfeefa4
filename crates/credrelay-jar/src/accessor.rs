//! The bundle accessor: per-domain collection with per-query failure
//! isolation.

use credrelay_core::{CredentialBundle, PlatformConfig};

use crate::traits::CredentialJar;

/// Collect the full credential bundle for one platform.
///
/// Each domain pattern is queried independently; a failing query is logged
/// and skipped so one bad domain cannot abort collection from the others.
/// The aggregate is deduplicated by `(name, domain)`, last seen wins.
///
/// Read-only. The result is always a bundle (possibly empty), never a
/// partially-thrown state.
pub async fn fetch_bundle(jar: &dyn CredentialJar, config: &PlatformConfig) -> CredentialBundle {
    let mut collected = Vec::new();
    for pattern in &config.domains {
        match jar.credentials_for_domain(pattern).await {
            Ok(mut records) => collected.append(&mut records),
            Err(err) => {
                tracing::warn!(
                    platform = %config.id,
                    pattern = %pattern,
                    "credential query failed: {err}"
                );
            }
        }
    }
    CredentialBundle::from_records(collected)
}
