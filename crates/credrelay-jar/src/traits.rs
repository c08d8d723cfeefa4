//! Jar trait: the abstract interface for credential stores.
//!
//! The trait is deliberately narrow: sync only ever reads credentials,
//! never writes them back. Change observation is a backend concern (see
//! [`MemoryJar::subscribe`](crate::MemoryJar::subscribe)); snapshot
//! backends simply have no events to publish.

use async_trait::async_trait;
use credrelay_core::{CredentialRecord, DomainPattern};

use crate::error::Result;

/// A live mutation observed in the credential jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialChange {
    /// The credential after the change (or as it was, for removals).
    pub record: CredentialRecord,
    /// Whether the credential was removed rather than added or updated.
    pub removed: bool,
}

/// Read access to a browser-style credential jar.
#[async_trait]
pub trait CredentialJar: Send + Sync {
    /// All records whose domain falls under the given pattern.
    ///
    /// Implementations must return records in a deterministic order for
    /// unchanged jar contents, so that repeated collection serializes
    /// identically.
    async fn credentials_for_domain(
        &self,
        pattern: &DomainPattern,
    ) -> Result<Vec<CredentialRecord>>;
}
