//! Security alerts - computed on every query, never persisted

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Abuse pattern an alert was raised for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    FailedLogin,
    UnusualLocation,
    RapidAccountCreation,
    HighValueNewAccount,
    RapidOrders,
}

impl AlertType {
    pub const ALL: [Self; 5] = [
        Self::FailedLogin,
        Self::UnusualLocation,
        Self::RapidAccountCreation,
        Self::HighValueNewAccount,
        Self::RapidOrders,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FailedLogin => "FAILED_LOGIN",
            Self::UnusualLocation => "UNUSUAL_LOCATION",
            Self::RapidAccountCreation => "RAPID_ACCOUNT_CREATION",
            Self::HighValueNewAccount => "HIGH_VALUE_NEW_ACCOUNT",
            Self::RapidOrders => "RAPID_ORDERS",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::UnknownAlertType(s.to_string()))
    }
}

/// Presentation rank of an alert.
///
/// Variant order is the feed order: `Critical` sorts before `High`, which
/// sorts before `Medium`, then `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Sort key; lower ranks come first in the feed
    #[inline]
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured detail backing an alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum AlertEvidence {
    FailedLogin {
        time_window_minutes: i64,
        threshold: i64,
        actual_count: i64,
        ip_addresses: Vec<String>,
    },
    UnusualLocation {
        current_country: String,
        historical_countries: Vec<String>,
        ip_address: String,
    },
    RapidAccountCreation {
        time_window_minutes: i64,
        threshold: i64,
        actual_count: i64,
    },
    HighValueNewAccount {
        order_id: String,
        order_value: i64,
        account_age_days: i64,
        is_first_order: bool,
    },
    RapidOrders {
        time_window_minutes: i64,
        threshold: i64,
        order_count: i64,
        order_ids: Vec<String>,
    },
}

/// One detector finding.
///
/// Alerts have no identity: every aggregation recomputes them from the logs,
/// and `timestamp` is when the detector ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAlert {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    pub message: String,
    pub evidence: AlertEvidence,
    pub timestamp: DateTime<Utc>,
}

/// Alert counts per severity for a feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertSummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total: usize,
}

impl AlertSummary {
    /// Tally a feed
    pub fn from_alerts(alerts: &[SecurityAlert]) -> Self {
        alerts.iter().fold(Self::default(), |mut summary, alert| {
            match alert.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
            summary.total += 1;
            summary
        })
    }

    /// Count for one type within a feed
    pub fn count_of(alerts: &[SecurityAlert], alert_type: AlertType) -> usize {
        alerts.iter().filter(|a| a.alert_type == alert_type).count()
    }
}
