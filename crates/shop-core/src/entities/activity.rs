//! Activity event entity - one immutable row of the audit log

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::DomainError;

/// Subject recorded for unauthenticated requests (e.g. a failed login for an unknown email)
pub const ANONYMOUS_USER: &str = "anonymous";

/// Subject recorded for actions taken by scheduled jobs
pub const SYSTEM_USER: &str = "system";

/// Recorded when the originating request carries no usable address
pub const UNKNOWN_IP: &str = "0.0.0.0";

/// Recorded when the originating request carries no User-Agent header
pub const UNKNOWN_USER_AGENT: &str = "unknown";

/// Closed set of actions written to the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    Login,
    LoginFailed,
    Logout,
    UserCreated,
    RoleChanged,
    AccountSuspended,
    AccountActivated,
    SecurityAlertDismissed,
    ProfileUpdated,
    PasswordChanged,
}

impl ActivityAction {
    /// Every action, in declaration order
    pub const ALL: [Self; 10] = [
        Self::Login,
        Self::LoginFailed,
        Self::Logout,
        Self::UserCreated,
        Self::RoleChanged,
        Self::AccountSuspended,
        Self::AccountActivated,
        Self::SecurityAlertDismissed,
        Self::ProfileUpdated,
        Self::PasswordChanged,
    ];

    /// Storage representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::Logout => "LOGOUT",
            Self::UserCreated => "USER_CREATED",
            Self::RoleChanged => "ROLE_CHANGED",
            Self::AccountSuspended => "ACCOUNT_SUSPENDED",
            Self::AccountActivated => "ACCOUNT_ACTIVATED",
            Self::SecurityAlertDismissed => "SECURITY_ALERT_DISMISSED",
            Self::ProfileUpdated => "PROFILE_UPDATED",
            Self::PasswordChanged => "PASSWORD_CHANGED",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| DomainError::UnknownAction(s.to_string()))
    }
}

/// A stored activity log row.
///
/// Rows are append-only: the only field that ever changes after insert is
/// `archived`, and only from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub id: Uuid,
    pub user_id: String,
    pub action: ActivityAction,
    pub metadata: JsonValue,
    pub ip_address: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
    pub archived: bool,
}

impl ActivityEvent {
    /// String value stored under `key` in the metadata object, if any
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(JsonValue::as_str)
    }

    /// Country recorded for a login, if geolocation succeeded
    pub fn country(&self) -> Option<&str> {
        self.metadata_str("country").filter(|c| !c.is_empty())
    }
}

/// Values for appending a new activity row; the store assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivityEvent {
    pub user_id: String,
    pub action: ActivityAction,
    pub metadata: Option<JsonValue>,
    pub ip_address: String,
    pub user_agent: String,
}

impl NewActivityEvent {
    /// Create an event for `user_id` originating from `client`
    pub fn new(user_id: impl Into<String>, action: ActivityAction, client: &ClientInfo) -> Self {
        Self {
            user_id: user_id.into(),
            action,
            metadata: None,
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
        }
    }

    /// Attach an action-specific metadata payload
    #[must_use]
    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Best-effort origin of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip_address: String,
    pub user_agent: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            ip_address: UNKNOWN_IP.to_string(),
            user_agent: UNKNOWN_USER_AGENT.to_string(),
        }
    }
}

impl ClientInfo {
    /// Create from already-extracted values
    pub fn new(ip_address: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Extract from raw header values.
    ///
    /// The first hop of `X-Forwarded-For` wins, then `X-Real-IP`; missing or
    /// blank values fall back to the sentinels.
    pub fn from_headers(
        forwarded_for: Option<&str>,
        real_ip: Option<&str>,
        user_agent: Option<&str>,
    ) -> Self {
        let ip_address = forwarded_for
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| real_ip.map(str::trim).filter(|v| !v.is_empty()))
            .unwrap_or(UNKNOWN_IP);

        let user_agent = user_agent
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN_USER_AGENT);

        Self::new(ip_address, user_agent)
    }
}
