//! Retention sweep tests
//!
//! Run with: cargo test -p integration-tests --test retention

use chrono::Duration;
use serde_json::json;

use integration_tests::{unique_id, TestHarness};
use shop_common::MAX_DAYS_TO_KEEP;
use shop_core::entities::ActivityAction;
use shop_service::{RetentionService, ServiceError};

fn seed_aged(h: &TestHarness, days: &[i64]) {
    let user = unique_id("user");
    for d in days {
        h.logs.seed(
            &user,
            ActivityAction::Login,
            "198.51.100.1",
            json!({ "country": "US" }),
            h.now - Duration::days(*d),
        );
    }
}

#[tokio::test]
async fn test_archive_is_idempotent() {
    let h = TestHarness::new();
    seed_aged(&h, &[120, 100, 91, 30, 1]);
    let service = RetentionService::new(&h.ctx);

    assert_eq!(service.archive_old_logs(90).await.unwrap(), 3);
    assert_eq!(service.archive_old_logs(90).await.unwrap(), 0);
}

#[tokio::test]
async fn test_archive_keeps_recent_rows_and_deletes_nothing() {
    let h = TestHarness::new();
    seed_aged(&h, &[200, 45, 2]);

    RetentionService::new(&h.ctx).archive_old_logs(90).await.unwrap();

    let rows = h.logs.all();
    assert_eq!(rows.len(), 3);
    let archived: Vec<bool> = rows.iter().map(|e| e.archived).collect();
    assert_eq!(archived, vec![true, false, false]);
}

#[tokio::test]
async fn test_shorter_retention_archives_more() {
    let h = TestHarness::new();
    seed_aged(&h, &[200, 45, 2]);
    let service = RetentionService::new(&h.ctx);

    assert_eq!(service.archive_old_logs(90).await.unwrap(), 1);
    assert_eq!(service.archive_old_logs(30).await.unwrap(), 1);
}

#[tokio::test]
async fn test_configured_retention_defaults_to_ninety_days() {
    let h = TestHarness::new();
    seed_aged(&h, &[95, 85]);

    let archived = RetentionService::new(&h.ctx)
        .archive_with_configured_retention()
        .await
        .unwrap();
    assert_eq!(archived, 1);
}

#[tokio::test]
async fn test_non_positive_retention_is_rejected() {
    let h = TestHarness::new();
    seed_aged(&h, &[400]);
    let service = RetentionService::new(&h.ctx);

    for days in [0, -5] {
        let err = service.archive_old_logs(days).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
    assert!(h.logs.all().iter().all(|e| !e.archived));
}

#[tokio::test]
async fn test_oversized_retention_is_rejected_without_panicking() {
    let h = TestHarness::new();
    seed_aged(&h, &[400]);
    let service = RetentionService::new(&h.ctx);

    for days in [i64::MAX, MAX_DAYS_TO_KEEP + 1] {
        let err = service.archive_old_logs(days).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(err.status_code(), 400);
    }
    assert!(h.logs.all().iter().all(|e| !e.archived));

    assert_eq!(service.archive_old_logs(MAX_DAYS_TO_KEEP).await.unwrap(), 0);
}

#[tokio::test]
async fn test_archive_store_failure_is_returned() {
    let h = TestHarness::new();
    h.logs.fail_all(true);

    let err = RetentionService::new(&h.ctx).archive_old_logs(90).await.unwrap_err();
    assert_eq!(err.error_code(), "DATABASE_ERROR");
}
