//! End-to-end sync scenarios over in-memory backends.

use credrelay::{dispatch, Command, Response};
use credrelay_core::{Channel, PlatformId};
use credrelay_testkit::TestFixture;
use credrelay_transport::HostBehavior;

fn p(id: &str) -> PlatformId {
    TestFixture::platform(id)
}

#[tokio::test]
async fn test_threshold_insufficient_then_sufficient() {
    let fx = TestFixture::new();
    // p1 requires six names; the threshold is ceil(6/3) = 2 matches.
    fx.insert_credential("a", "1", ".p1.example");
    fx.insert_credential("x", "9", ".p1.example");

    let outcome = fx.relay.sync_one(&p("p1")).await;
    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_deref(),
        Some("cookies incomplete, please log in again")
    );
    assert!(fx.host.requests().is_empty());

    fx.insert_credential("b", "2", ".p1.example");
    let outcome = fx.relay.sync_one(&p("p1")).await;
    assert!(outcome.success);
    assert_eq!(outcome.channel, Some(Channel::Primary));
    assert_eq!(outcome.credential_count, Some(3));
}

#[tokio::test]
async fn test_empty_jar_reports_no_credentials() {
    let fx = TestFixture::new();
    let outcome = fx.relay.sync_one(&p("p1")).await;
    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_deref(),
        Some("no cookies found, please log in")
    );
    assert!(fx.host.requests().is_empty());
}

#[tokio::test]
async fn test_unconfigured_platform_reports_no_credentials() {
    let fx = TestFixture::new();
    let outcome = fx.relay.sync_one(&p("weibo")).await;
    assert!(!outcome.success);
    assert!(outcome.error.is_some());
    assert!(fx.host.requests().is_empty());
}

#[tokio::test]
async fn test_sync_all_mixed_channels() {
    let fx = TestFixture::new();
    fx.seed_p1_sufficient();
    fx.seed_p2_sufficient();
    fx.host.set_behavior_for(p("p2"), HostBehavior::Unreachable);

    let results = fx.relay.sync_all().await;
    assert_eq!(results.len(), 2);

    let p1 = &results[&p("p1")];
    assert!(p1.success);
    assert_eq!(p1.channel, Some(Channel::Primary));

    let p2 = &results[&p("p2")];
    assert!(p2.success);
    assert_eq!(p2.channel, Some(Channel::Fallback));

    // Only p2's payload waits for manual export.
    let pending = fx.relay.pending_exports().await.unwrap();
    assert_eq!(pending.keys().collect::<Vec<_>>(), [&p("p2")]);

    // Sync records reflect the channels actually used.
    let status = fx.relay.sync_status().await.unwrap();
    assert_eq!(status[&p("p1")].channel, Channel::Primary);
    assert_eq!(status[&p("p2")].channel, Channel::Fallback);
}

#[tokio::test]
async fn test_sync_all_partial_failure_isolated() {
    let fx = TestFixture::new();
    fx.seed_p2_sufficient(); // p1 left empty on purpose

    let results = fx.relay.sync_all().await;
    assert!(!results[&p("p1")].success);
    assert!(results[&p("p2")].success);
}

#[tokio::test]
async fn test_fallback_guarantee_when_primary_down() {
    let fx = TestFixture::with_host_behavior(HostBehavior::Unreachable);
    fx.seed_p1_sufficient();

    let outcome = fx.relay.sync_one(&p("p1")).await;
    assert!(outcome.success);
    assert_eq!(outcome.channel, Some(Channel::Fallback));

    let pending = fx.relay.pending_exports().await.unwrap();
    assert_eq!(pending[&p("p1")].cookie, "a=1; b=2");

    // A resync overwrites both the pending payload and the sync record;
    // exactly one of each remains.
    fx.insert_credential("a", "changed", ".p1.example");
    let outcome = fx.relay.sync_one(&p("p1")).await;
    assert!(outcome.success);

    let pending = fx.relay.pending_exports().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[&p("p1")].cookie, "a=changed; b=2");

    let status = fx.relay.sync_status().await.unwrap();
    assert_eq!(status.len(), 1);
    assert_eq!(status[&p("p1")].payload_len, "a=changed; b=2".len());
}

#[tokio::test]
async fn test_declined_host_is_not_a_sync_failure() {
    let fx = TestFixture::with_host_behavior(HostBehavior::Decline);
    fx.seed_p1_sufficient();

    let outcome = fx.relay.sync_one(&p("p1")).await;
    assert!(outcome.success);
    assert_eq!(outcome.channel, Some(Channel::Fallback));
}

#[tokio::test]
async fn test_command_surface_resolves_every_command() {
    let fx = TestFixture::new();
    fx.seed_p1_sufficient();

    match dispatch(&fx.relay, Command::SyncCookie { platform: p("p1") }).await {
        Response::Outcome(outcome) => assert!(outcome.success),
        other => panic!("unexpected response: {other:?}"),
    }

    match dispatch(&fx.relay, Command::GetCookieString { platform: p("p1") }).await {
        Response::CookieString(r) => {
            assert!(r.success);
            assert_eq!(r.cookie.as_deref(), Some("a=1; b=2"));
            assert_eq!(r.count, Some(2));
        }
        other => panic!("unexpected response: {other:?}"),
    }

    // An empty platform still resolves to a response object.
    match dispatch(&fx.relay, Command::GetCookieString { platform: p("p2") }).await {
        Response::CookieString(r) => {
            assert!(!r.success);
            assert!(r.error.is_some());
        }
        other => panic!("unexpected response: {other:?}"),
    }

    match dispatch(&fx.relay, Command::GetSyncStatus).await {
        Response::Status(status) => assert!(status.contains_key(&p("p1"))),
        other => panic!("unexpected response: {other:?}"),
    }

    match dispatch(&fx.relay, Command::GetPendingCookies).await {
        Response::Pending(pending) => assert!(pending.is_empty()),
        other => panic!("unexpected response: {other:?}"),
    }

    match dispatch(&fx.relay, Command::SyncAllCookies).await {
        Response::Outcomes(results) => assert_eq!(results.len(), 2),
        other => panic!("unexpected response: {other:?}"),
    }
}
