//! Change watcher filtering and resync behavior.

use std::time::Duration;

use credrelay::ChangeWatcher;
use credrelay_core::CredentialRecord;
use credrelay_jar::CredentialChange;
use credrelay_testkit::TestFixture;
use credrelay_transport::HostRequest;

fn change(name: &str, value: &str, domain: &str, removed: bool) -> CredentialChange {
    CredentialChange {
        record: CredentialRecord::new(name, value, domain),
        removed,
    }
}

#[tokio::test]
async fn test_removal_event_fires_no_transport_call() {
    let fx = TestFixture::new();
    fx.seed_p1_sufficient();
    let watcher = ChangeWatcher::new(fx.relay.clone());

    let handled = watcher
        .handle_change(&change("a", "1", ".p1.example", true))
        .await;
    assert!(handled.is_none());
    assert!(fx.host.requests().is_empty());
}

#[tokio::test]
async fn test_unclassified_domain_skipped() {
    let fx = TestFixture::new();
    fx.seed_p1_sufficient();
    let watcher = ChangeWatcher::new(fx.relay.clone());

    let handled = watcher
        .handle_change(&change("a", "1", ".unrelated.example", false))
        .await;
    assert!(handled.is_none());
    assert!(fx.host.requests().is_empty());
}

#[tokio::test]
async fn test_incidental_credential_name_skipped() {
    let fx = TestFixture::new();
    fx.seed_p1_sufficient();
    let watcher = ChangeWatcher::new(fx.relay.clone());

    let handled = watcher
        .handle_change(&change("tracking_pixel", "1", ".p1.example", false))
        .await;
    assert!(handled.is_none());
    assert!(fx.host.requests().is_empty());
}

#[tokio::test]
async fn test_required_change_resyncs_full_bundle() {
    let fx = TestFixture::new();
    fx.seed_p1_sufficient();
    let watcher = ChangeWatcher::new(fx.relay.clone());

    let (platform, outcome) = watcher
        .handle_change(&change("a", "1", ".p1.example", false))
        .await
        .unwrap();
    assert_eq!(platform, TestFixture::platform("p1"));
    assert!(outcome.success);

    // The transport saw the entire current bundle, not just the changed
    // credential.
    let requests = fx.host.requests();
    assert_eq!(requests.len(), 1);
    match &requests[0] {
        HostRequest::UpdateCookie { cookie, .. } => assert_eq!(cookie, "a=1; b=2"),
        other => panic!("unexpected request: {other:?}"),
    }
}

#[tokio::test]
async fn test_run_loop_follows_jar_events() {
    let fx = TestFixture::new();
    let changes = fx.jar.subscribe();
    let watcher = ChangeWatcher::new(fx.relay.clone());
    let handle = tokio::spawn(watcher.run(changes));

    // The first insert leaves p1 insufficient (one match of six); the
    // second crosses the threshold and triggers a delivery.
    fx.insert_credential("a", "1", ".p1.example");
    fx.insert_credential("b", "2", ".p1.example");

    let mut delivered = false;
    for _ in 0..100 {
        if !fx.host.requests().is_empty() {
            delivered = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    handle.abort();

    assert!(delivered, "watcher never delivered after a relevant change");
    match &fx.host.requests()[0] {
        HostRequest::UpdateCookie { cookie, .. } => assert_eq!(cookie, "a=1; b=2"),
        other => panic!("unexpected request: {other:?}"),
    }
}
