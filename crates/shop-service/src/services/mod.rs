//! Business logic services
//!
//! This module contains the service layer implementations that handle
//! detection, audit recording, and retention.

pub mod activity;
pub mod context;
pub mod error;
pub mod retention;
pub mod security;

// Re-export all services for convenience
pub use activity::ActivityLogService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use retention::{RetentionService, DEFAULT_DAYS_TO_KEEP};
pub use security::SecurityAlertService;
