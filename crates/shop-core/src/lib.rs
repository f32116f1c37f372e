//! # shop-core
//!
//! Domain layer for the admin platform's audit subsystem: activity events,
//! order facts, computed security alerts, and the repository traits the
//! detectors read through. This crate has zero dependencies on
//! infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{
    ActivityAction, ActivityEvent, AlertEvidence, AlertSummary, AlertType, ClientInfo,
    CustomerProfile, NewActivityEvent, Order, SecurityAlert, Severity, ANONYMOUS_USER,
    SYSTEM_USER, UNKNOWN_IP, UNKNOWN_USER_AGENT,
};
pub use error::DomainError;
pub use traits::{
    ActivityLogRepository, EventQuery, GroupCount, GroupKey, LowerBound, OrderQuery,
    OrderRepository, RepoResult, TimeRange,
};
