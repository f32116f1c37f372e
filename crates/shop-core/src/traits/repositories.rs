//! Repository traits (ports) - define the interface for data access
//!
//! The activity log and order tables are owned elsewhere; the detectors only
//! need the narrow filtered/grouped reads declared here. The infrastructure
//! layer provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{ActivityAction, ActivityEvent, CustomerProfile, NewActivityEvent, Order};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Query shapes
// ============================================================================

/// Lower edge of a `created_at` range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowerBound {
    /// `created_at >= t`
    Inclusive(DateTime<Utc>),
    /// `created_at > t`
    Exclusive(DateTime<Utc>),
}

/// Half-open `created_at` range. The upper edge, when set, is always exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<LowerBound>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Everything at or after `start`
    pub fn since(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(LowerBound::Inclusive(start)),
            end: None,
        }
    }

    /// Everything strictly after `start`
    pub fn after(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(LowerBound::Exclusive(start)),
            end: None,
        }
    }

    /// Restrict to rows strictly before `end`
    #[must_use]
    pub fn before(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Whether `t` falls inside the range
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        let lower_ok = match self.start {
            Some(LowerBound::Inclusive(s)) => t >= s,
            Some(LowerBound::Exclusive(s)) => t > s,
            None => true,
        };
        lower_ok && self.end.map_or(true, |e| t < e)
    }
}

/// Filter for activity log reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub action: Option<ActivityAction>,
    pub user_ids: Option<Vec<String>>,
    pub created_at: TimeRange,
}

impl EventQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn action(mut self, action: ActivityAction) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn user_ids(mut self, user_ids: Vec<String>) -> Self {
        self.user_ids = Some(user_ids);
        self
    }

    #[must_use]
    pub fn created(mut self, range: TimeRange) -> Self {
        self.created_at = range;
        self
    }

    /// In-process evaluation of the filter, for stores without a query engine
    pub fn matches(&self, event: &ActivityEvent) -> bool {
        self.action.map_or(true, |a| event.action == a)
            && self
                .user_ids
                .as_ref()
                .map_or(true, |ids| ids.iter().any(|id| *id == event.user_id))
            && self.created_at.contains(event.created_at)
    }
}

/// Column an event count is grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    UserId,
    IpAddress,
}

impl GroupKey {
    /// Value of this key on an event
    pub fn of<'a>(&self, event: &'a ActivityEvent) -> &'a str {
        match self {
            Self::UserId => &event.user_id,
            Self::IpAddress => &event.ip_address,
        }
    }
}

/// What a grouped count counts within each group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CountMode {
    /// Every matching row
    #[default]
    Rows,
    /// Distinct `user_id` values; repeated rows for one user count once
    DistinctUsers,
}

/// One row of a grouped count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: i64,
}

/// Filter for order reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub created_at: TimeRange,
    pub total_gte: Option<i64>,
    pub user_ids: Option<Vec<String>>,
}

impl OrderQuery {
    pub fn new(created_at: TimeRange) -> Self {
        Self {
            created_at,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn total_gte(mut self, minimum: i64) -> Self {
        self.total_gte = Some(minimum);
        self
    }

    #[must_use]
    pub fn user_ids(mut self, user_ids: Vec<String>) -> Self {
        self.user_ids = Some(user_ids);
        self
    }

    /// In-process evaluation of the filter
    pub fn matches(&self, order: &Order) -> bool {
        self.created_at.contains(order.created_at)
            && self.total_gte.map_or(true, |min| order.total >= min)
            && self
                .user_ids
                .as_ref()
                .map_or(true, |ids| ids.iter().any(|id| *id == order.user_id))
    }
}

// ============================================================================
// Activity Log Repository
// ============================================================================

#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    /// Events matching the filter, newest first
    async fn find_events(&self, query: &EventQuery) -> RepoResult<Vec<ActivityEvent>>;

    /// Count matching events per `group_by` value, keeping groups whose count
    /// under `mode` is at least `min_count`
    async fn count_grouped(
        &self,
        query: &EventQuery,
        group_by: GroupKey,
        mode: CountMode,
        min_count: i64,
    ) -> RepoResult<Vec<GroupCount>>;

    /// Append one event; the store assigns `id` and `created_at`
    async fn insert(&self, event: &NewActivityEvent) -> RepoResult<ActivityEvent>;

    /// Flag every non-archived row created before `cutoff`; returns rows affected
    async fn mark_archived_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64>;
}

// ============================================================================
// Order Repository
// ============================================================================

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Orders matching the filter, newest first
    async fn find_orders(&self, query: &OrderQuery) -> RepoResult<Vec<Order>>;

    /// Account creation time and lifetime order count for a customer
    async fn find_customer_profile(&self, user_id: &str) -> RepoResult<Option<CustomerProfile>>;
}
