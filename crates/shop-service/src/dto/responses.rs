//! Response DTOs
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shop_core::entities::{AlertSummary, SecurityAlert};

/// Acknowledgement of a recorded dismissal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DismissAlertResponse {
    pub success: bool,
    pub message: String,
}

/// Severity-sorted alerts with their tally
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAlertFeed {
    pub alerts: Vec<SecurityAlert>,
    pub summary: AlertSummary,
    pub generated_at: DateTime<Utc>,
}

impl SecurityAlertFeed {
    pub fn new(alerts: Vec<SecurityAlert>, generated_at: DateTime<Utc>) -> Self {
        let summary = AlertSummary::from_alerts(&alerts);
        Self {
            alerts,
            summary,
            generated_at,
        }
    }
}
