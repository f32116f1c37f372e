//! Request DTOs
//!
//! Request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

use shop_core::entities::{AlertType, ClientInfo};

/// Analyst decision to dismiss an alert
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DismissAlertRequest {
    pub alert_type: AlertType,

    /// Subject the alert was raised for, when user-scoped
    pub user_id: Option<String>,

    /// Subject the alert was raised for, when IP-scoped
    pub ip_address: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,

    #[validate(length(min = 1, message = "Dismissing user is required"))]
    pub dismissed_by: String,

    pub dismissed_by_ip: String,

    pub dismissed_by_user_agent: String,
}

impl DismissAlertRequest {
    /// Dismissal of `alert_type` by `dismissed_by`, originating from `client`
    pub fn new(
        alert_type: AlertType,
        reason: impl Into<String>,
        dismissed_by: impl Into<String>,
        client: &ClientInfo,
    ) -> Self {
        Self {
            alert_type,
            user_id: None,
            ip_address: None,
            reason: reason.into(),
            dismissed_by: dismissed_by.into(),
            dismissed_by_ip: client.ip_address.clone(),
            dismissed_by_user_agent: client.user_agent.clone(),
        }
    }

    #[must_use]
    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn for_ip(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }
}
