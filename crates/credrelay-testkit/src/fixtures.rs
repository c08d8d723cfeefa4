//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use credrelay::{Relay, RelayConfig};
use credrelay_core::{
    CredentialRecord, DomainPattern, PlatformConfig, PlatformId, PlatformRegistry,
};
use credrelay_jar::MemoryJar;
use credrelay_store::MemoryStore;
use credrelay_transport::{HostBehavior, MemoryHost};

/// A relay wired against in-memory backends.
pub struct TestFixture {
    pub jar: Arc<MemoryJar>,
    pub store: Arc<MemoryStore>,
    pub host: Arc<MemoryHost>,
    pub relay: Arc<Relay>,
}

impl TestFixture {
    /// Registry with two test platforms:
    ///
    /// - `p1` on `.p1.example`, required names `a`..`f` (threshold 2)
    /// - `p2` on `.p2.example`, required names `k1`, `k2` (threshold 1)
    pub fn test_registry() -> PlatformRegistry {
        PlatformRegistry::new(vec![
            PlatformConfig::new(
                "p1",
                vec![DomainPattern::from(".p1.example")],
                ["a", "b", "c", "d", "e", "f"].map(String::from).to_vec(),
            ),
            PlatformConfig::new(
                "p2",
                vec![DomainPattern::from(".p2.example")],
                ["k1", "k2"].map(String::from).to_vec(),
            ),
        ])
    }

    /// Fixture with an accepting host and zero batch pause.
    pub fn new() -> Self {
        Self::with_host_behavior(HostBehavior::Accept)
    }

    /// Fixture with the given default host behavior.
    pub fn with_host_behavior(behavior: HostBehavior) -> Self {
        crate::init_tracing();

        let jar = Arc::new(MemoryJar::new());
        let store = Arc::new(MemoryStore::new());
        let host = Arc::new(MemoryHost::with_behavior(behavior));
        let relay = Arc::new(Relay::new(
            Self::test_registry(),
            jar.clone(),
            store.clone(),
            host.clone(),
            RelayConfig {
                batch_pause: std::time::Duration::ZERO,
            },
        ));

        Self {
            jar,
            store,
            host,
            relay,
        }
    }

    /// Insert one credential into the jar.
    pub fn insert_credential(&self, name: &str, value: &str, domain: &str) {
        self.jar.insert(CredentialRecord::new(name, value, domain));
    }

    /// Seed `p1` with a sufficient bundle (`a` and `b`).
    pub fn seed_p1_sufficient(&self) {
        self.insert_credential("a", "1", ".p1.example");
        self.insert_credential("b", "2", ".p1.example");
    }

    /// Seed `p2` with a sufficient bundle (`k1`).
    pub fn seed_p2_sufficient(&self) {
        self.insert_credential("k1", "9", ".p2.example");
    }

    /// Convenience id constructor.
    pub fn platform(id: &str) -> PlatformId {
        PlatformId::new(id)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
