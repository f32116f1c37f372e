//! Order facts consumed by the fraud detectors

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The subset of an order record the fraud detectors read.
///
/// `total` is in minor currency units (cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub total: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Per-customer aggregates: when the account was opened and how many orders it has placed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerProfile {
    pub user_id: String,
    pub account_created_at: DateTime<Utc>,
    pub order_count: i64,
}

impl CustomerProfile {
    /// Whole days elapsed between account creation and `now`
    pub fn account_age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.account_created_at).num_days()
    }

    /// True when the customer has exactly one order on record
    #[inline]
    pub fn is_first_order(&self) -> bool {
        self.order_count == 1
    }
}
