//! Service context - dependency container for services
//!
//! Constructed once at process start and handed to each service by
//! reference; there is no global state.

use std::sync::Arc;

use shop_common::{DetectionThresholds, RetentionConfig};
use shop_core::traits::{ActivityLogRepository, OrderRepository};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Provides access to:
/// - The activity log and order repositories
/// - Detector thresholds
/// - Retention settings for the archival sweep
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    activity_repo: Arc<dyn ActivityLogRepository>,
    order_repo: Arc<dyn OrderRepository>,

    // Settings
    thresholds: Arc<DetectionThresholds>,
    retention: RetentionConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        activity_repo: Arc<dyn ActivityLogRepository>,
        order_repo: Arc<dyn OrderRepository>,
        thresholds: DetectionThresholds,
        retention: RetentionConfig,
    ) -> Self {
        Self {
            activity_repo,
            order_repo,
            thresholds: Arc::new(thresholds),
            retention,
        }
    }

    // === Repositories ===

    /// Get the activity log repository
    pub fn activity_repo(&self) -> &dyn ActivityLogRepository {
        self.activity_repo.as_ref()
    }

    /// Shared handle to the activity log repository, for work that outlives the borrow
    pub fn activity_repo_handle(&self) -> Arc<dyn ActivityLogRepository> {
        Arc::clone(&self.activity_repo)
    }

    /// Get the order repository
    pub fn order_repo(&self) -> &dyn OrderRepository {
        self.order_repo.as_ref()
    }

    // === Settings ===

    /// Detector windows and thresholds
    pub fn thresholds(&self) -> &DetectionThresholds {
        self.thresholds.as_ref()
    }

    /// Retention settings
    pub fn retention(&self) -> &RetentionConfig {
        &self.retention
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("thresholds", &self.thresholds)
            .field("retention", &self.retention)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    activity_repo: Option<Arc<dyn ActivityLogRepository>>,
    order_repo: Option<Arc<dyn OrderRepository>>,
    thresholds: Option<DetectionThresholds>,
    retention: Option<RetentionConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activity_repo(mut self, repo: Arc<dyn ActivityLogRepository>) -> Self {
        self.activity_repo = Some(repo);
        self
    }

    pub fn order_repo(mut self, repo: Arc<dyn OrderRepository>) -> Self {
        self.order_repo = Some(repo);
        self
    }

    pub fn thresholds(mut self, thresholds: DetectionThresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    pub fn retention(mut self, retention: RetentionConfig) -> Self {
        self.retention = Some(retention);
        self
    }

    /// Build the ServiceContext
    ///
    /// Thresholds and retention fall back to their defaults.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.activity_repo
                .ok_or_else(|| ServiceError::validation("activity_repo is required"))?,
            self.order_repo
                .ok_or_else(|| ServiceError::validation("order_repo is required"))?,
            self.thresholds.unwrap_or_default(),
            self.retention.unwrap_or_default(),
        ))
    }
}
