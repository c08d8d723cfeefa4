//! Export artifact: file shape and pending consumption.

use credrelay::{write_export, ExportedConfig};
use credrelay_testkit::TestFixture;
use credrelay_transport::HostBehavior;

#[tokio::test]
async fn test_export_mixes_live_and_pending_sources() {
    let fx = TestFixture::with_host_behavior(HostBehavior::Unreachable);

    // p2 syncs into the fallback queue, then loses its jar contents, so
    // its export entry must come from the pending payload.
    fx.seed_p2_sufficient();
    let outcome = fx.relay.sync_one(&TestFixture::platform("p2")).await;
    assert!(outcome.success);
    fx.jar.remove("k1", ".p2.example");

    // p1 exports straight from the live jar.
    fx.seed_p1_sufficient();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let exported = write_export(&fx.relay, &path).await.unwrap();

    assert_eq!(exported.platforms.len(), 2);
    assert_eq!(
        exported.platforms[&TestFixture::platform("p1")].cookie,
        "a=1; b=2"
    );
    assert_eq!(
        exported.platforms[&TestFixture::platform("p2")].cookie,
        "k1=9"
    );

    // The file round-trips and carries the settings block.
    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: ExportedConfig = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, exported);
    assert_eq!(parsed.settings.works_limit, 50);
    assert!(parsed.settings.notifications.macos);

    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["p1"]["enabled"], true);
    assert_eq!(value["p1"]["cookie_expires_hint"], 7);

    // The pending payload folded into the export was consumed.
    assert!(fx.relay.pending_exports().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_export_skips_platforms_with_nothing_to_say() {
    let fx = TestFixture::new();
    fx.seed_p1_sufficient();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let exported = write_export(&fx.relay, &path).await.unwrap();

    assert_eq!(exported.platforms.len(), 1);
    assert!(exported
        .platforms
        .contains_key(&TestFixture::platform("p1")));
}

#[tokio::test]
async fn test_export_prefers_live_jar_over_pending() {
    let fx = TestFixture::with_host_behavior(HostBehavior::Unreachable);
    fx.seed_p2_sufficient();
    fx.relay.sync_one(&TestFixture::platform("p2")).await;

    // Jar still has p2 credentials, so the pending payload stays queued.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let exported = write_export(&fx.relay, &path).await.unwrap();

    assert_eq!(
        exported.platforms[&TestFixture::platform("p2")].cookie,
        "k1=9"
    );
    assert!(!fx.relay.pending_exports().await.unwrap().is_empty());
}
