//! # shop-service
//!
//! Application layer: the security-alert detectors and the aggregator that
//! merges them, the dismissal recorder, activity ingestion, and the
//! retention sweep. Services borrow a [`ServiceContext`] that carries the
//! repositories and settings they need.

pub mod dto;
pub mod services;

pub use services::{
    ActivityLogService, RetentionService, SecurityAlertService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult,
};
