//! Test helpers for integration tests
//!
//! Builds a [`ServiceContext`] over the in-memory stores and seeds the
//! event shapes the detectors look for.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::Level;

use shop_common::{try_init_tracing, DetectionThresholds, RetentionConfig, TracingConfig};
use shop_core::entities::ActivityAction;
use shop_service::{ServiceContext, ServiceContextBuilder};

use crate::fixtures::{InMemoryActivityLog, InMemoryOrderStore};

/// Stores plus a context wired to them
pub struct TestHarness {
    pub logs: Arc<InMemoryActivityLog>,
    pub orders: Arc<InMemoryOrderStore>,
    pub ctx: ServiceContext,
    /// Instant every seeded offset is measured from
    pub now: DateTime<Utc>,
}

impl TestHarness {
    /// Empty stores, default thresholds
    pub fn new() -> Self {
        Self::with_thresholds(DetectionThresholds::default())
    }

    pub fn with_thresholds(thresholds: DetectionThresholds) -> Self {
        init_test_tracing();

        let logs = Arc::new(InMemoryActivityLog::new());
        let orders = Arc::new(InMemoryOrderStore::new());
        let ctx = ServiceContextBuilder::new()
            .activity_repo(logs.clone())
            .order_repo(orders.clone())
            .thresholds(thresholds)
            .retention(RetentionConfig::default())
            .build()
            .expect("both repositories are set");

        Self {
            logs,
            orders,
            ctx,
            now: Utc::now(),
        }
    }

    /// `count` failed logins for `user_id`, each `ago` before `now`
    pub fn failed_logins(&self, user_id: &str, ip: &str, count: usize, ago: Duration) {
        for _ in 0..count {
            self.logs.seed(
                user_id,
                ActivityAction::LoginFailed,
                ip,
                json!({ "reason": "invalid_password" }),
                self.now - ago,
            );
        }
    }

    /// One successful login geolocated to `country`
    pub fn login_from(&self, user_id: &str, ip: &str, country: &str, ago: Duration) {
        self.logs.seed(
            user_id,
            ActivityAction::Login,
            ip,
            json!({ "country": country, "city": "Somewhere" }),
            self.now - ago,
        );
    }

    /// One account registration from `ip`
    pub fn signup_from(&self, ip: &str, ago: Duration) -> String {
        let user_id = crate::fixtures::unique_id("signup");
        self.logs.seed(
            &user_id,
            ActivityAction::UserCreated,
            ip,
            json!({ "email": format!("{user_id}@example.com") }),
            self.now - ago,
        );
        user_id
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Install a test subscriber once; later calls are no-ops
pub fn init_test_tracing() {
    let _ = try_init_tracing(&TracingConfig {
        level: Level::WARN,
        ..TracingConfig::default()
    });
}
