//! Domain entities - core business objects

mod activity;
mod alert;
mod order;

pub use activity::{
    ActivityAction, ActivityEvent, ClientInfo, NewActivityEvent, ANONYMOUS_USER, SYSTEM_USER,
    UNKNOWN_IP, UNKNOWN_USER_AGENT,
};
pub use alert::{AlertEvidence, AlertSummary, AlertType, SecurityAlert, Severity};
pub use order::{CustomerProfile, Order};
