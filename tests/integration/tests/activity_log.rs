//! Activity ingestion tests
//!
//! Run with: cargo test -p integration-tests --test activity_log

use futures::future::join_all;
use serde_json::json;

use integration_tests::{unique_id, TestHarness};
use shop_core::entities::{ActivityAction, AlertType, ClientInfo, NewActivityEvent};
use shop_service::{ActivityLogService, SecurityAlertService};

fn client() -> ClientInfo {
    ClientInfo::from_headers(Some("203.0.113.40, 10.0.0.1"), None, Some("Mozilla/5.0"))
}

#[tokio::test]
async fn test_log_activity_returns_stored_event() {
    let h = TestHarness::new();
    let user = unique_id("user");

    let stored = ActivityLogService::new(&h.ctx)
        .log_activity(
            NewActivityEvent::new(&user, ActivityAction::PasswordChanged, &client())
                .with_metadata(json!({ "method": "reset_link" })),
        )
        .await
        .expect("insert succeeds");

    assert_eq!(stored.user_id, user);
    assert_eq!(stored.action, ActivityAction::PasswordChanged);
    assert_eq!(stored.ip_address, "203.0.113.40");
    assert_eq!(stored.user_agent, "Mozilla/5.0");
    assert_eq!(stored.metadata_str("method"), Some("reset_link"));
    assert!(!stored.archived);
    assert_eq!(h.logs.len(), 1);
}

#[tokio::test]
async fn test_store_rejection_is_swallowed() {
    let h = TestHarness::new();
    h.logs.reject_user("not-a-user");

    let result = ActivityLogService::new(&h.ctx)
        .log_activity(NewActivityEvent::new(
            "not-a-user",
            ActivityAction::Login,
            &ClientInfo::default(),
        ))
        .await;

    assert!(result.is_none());
    assert!(h.logs.is_empty());
}

#[tokio::test]
async fn test_store_outage_is_swallowed_by_typed_helpers() {
    let h = TestHarness::new();
    h.logs.fail_all(true);
    let service = ActivityLogService::new(&h.ctx);

    assert!(service.log_login("u1", &client(), Some("US"), None).await.is_none());
    assert!(service.log_login_failed("u1", &client(), "bad_password").await.is_none());
    assert!(service.log_logout("u1", &client()).await.is_none());
}

#[tokio::test]
async fn test_spawned_ingestion_completes_in_background() {
    let h = TestHarness::new();
    let handle = ActivityLogService::new(&h.ctx).spawn_log_activity(NewActivityEvent::new(
        unique_id("user"),
        ActivityAction::Logout,
        &client(),
    ));

    let stored = handle.await.expect("task does not panic");
    assert!(stored.is_some());
    assert_eq!(h.logs.len(), 1);
}

#[tokio::test]
async fn test_spawned_ingestion_failure_resolves_to_none() {
    let h = TestHarness::new();
    h.logs.fail_all(true);

    let handle = ActivityLogService::new(&h.ctx).spawn_log_activity(NewActivityEvent::new(
        unique_id("user"),
        ActivityAction::Logout,
        &client(),
    ));

    assert!(handle.await.expect("task does not panic").is_none());
}

#[tokio::test]
async fn test_typed_helpers_record_metadata() {
    let h = TestHarness::new();
    let service = ActivityLogService::new(&h.ctx);
    let user = unique_id("user");

    let login = service
        .log_login(&user, &client(), Some("DE"), Some("Berlin"))
        .await
        .unwrap();
    assert_eq!(login.country(), Some("DE"));
    assert_eq!(login.metadata_str("city"), Some("Berlin"));

    let unlocated = service.log_login(&user, &client(), None, None).await.unwrap();
    assert_eq!(unlocated.metadata, json!({}));
    assert!(unlocated.country().is_none());

    let role = service
        .log_role_changed("admin-1", &client(), &user, "customer", "staff")
        .await
        .unwrap();
    assert_eq!(role.user_id, "admin-1");
    assert_eq!(role.metadata["targetUserId"], user.as_str());
    assert_eq!(role.metadata["newRole"], "staff");

    let suspended = service
        .log_account_suspended("admin-1", &client(), &user, Some("chargebacks"))
        .await
        .unwrap();
    assert_eq!(suspended.action, ActivityAction::AccountSuspended);
    assert_eq!(suspended.metadata["reason"], "chargebacks");

    let activated = service
        .log_account_activated("admin-1", &client(), &user)
        .await
        .unwrap();
    assert_eq!(activated.action, ActivityAction::AccountActivated);

    let created = service
        .log_user_created(&user, &client(), "new@example.com")
        .await
        .unwrap();
    assert_eq!(created.metadata_str("email"), Some("new@example.com"));

    let profile = service
        .log_profile_updated(&user, &client(), &["displayName", "phone"])
        .await
        .unwrap();
    assert_eq!(profile.metadata["changedFields"], json!(["displayName", "phone"]));

    assert_eq!(h.logs.len(), 7);
}

#[tokio::test]
async fn test_concurrent_ingestion_keeps_every_event() {
    let h = TestHarness::new();
    let service = ActivityLogService::new(&h.ctx);
    let user = unique_id("user");
    let origin = client();

    let results = join_all((0..25).map(|_| service.log_logout(&user, &origin))).await;

    assert!(results.iter().all(Option::is_some));
    assert_eq!(h.logs.len(), 25);
}

#[tokio::test]
async fn test_ingested_failures_feed_detector() {
    let h = TestHarness::new();
    let service = ActivityLogService::new(&h.ctx);
    let user = unique_id("user");

    for _ in 0..5 {
        service.log_login_failed(&user, &client(), "bad_password").await;
    }

    let alerts = SecurityAlertService::new(&h.ctx)
        .get_all_security_alerts()
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_type, AlertType::FailedLogin);
    assert_eq!(alerts[0].user_id.as_deref(), Some(user.as_str()));
}
