//! Shared WHERE-clause builders
//!
//! Every builder here expects the query to already contain a `WHERE TRUE`
//! and appends `AND ...` conditions with bound parameters.

use sqlx::{Postgres, QueryBuilder};

use shop_core::traits::{CountMode, EventQuery, GroupKey, LowerBound, OrderQuery, TimeRange};

/// Columns of activity_logs, in model order
pub const ACTIVITY_COLUMNS: &str =
    "id, user_id, action, metadata, ip_address, user_agent, created_at, archived";

/// Columns of orders, in model order
pub const ORDER_COLUMNS: &str = "id, user_id, total, status, created_at";

pub fn push_time_range(builder: &mut QueryBuilder<'_, Postgres>, range: &TimeRange) {
    match range.start {
        Some(LowerBound::Inclusive(start)) => {
            builder.push(" AND created_at >= ").push_bind(start);
        }
        Some(LowerBound::Exclusive(start)) => {
            builder.push(" AND created_at > ").push_bind(start);
        }
        None => {}
    }
    if let Some(end) = range.end {
        builder.push(" AND created_at < ").push_bind(end);
    }
}

pub fn push_event_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &EventQuery) {
    if let Some(action) = query.action {
        builder.push(" AND action = ").push_bind(action.as_str());
    }
    if let Some(user_ids) = &query.user_ids {
        builder.push(" AND user_id = ANY(").push_bind(user_ids.clone()).push(")");
    }
    push_time_range(builder, &query.created_at);
}

pub fn push_order_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &OrderQuery) {
    if let Some(minimum) = query.total_gte {
        builder.push(" AND total >= ").push_bind(minimum);
    }
    if let Some(user_ids) = &query.user_ids {
        builder.push(" AND user_id = ANY(").push_bind(user_ids.clone()).push(")");
    }
    push_time_range(builder, &query.created_at);
}

/// Column a grouped count is keyed on
pub fn group_column(key: GroupKey) -> &'static str {
    match key {
        GroupKey::UserId => "user_id",
        GroupKey::IpAddress => "ip_address",
    }
}

/// Aggregate a grouped count selects and filters on
pub fn count_expr(mode: CountMode) -> &'static str {
    match mode {
        CountMode::Rows => "COUNT(*)",
        CountMode::DistinctUsers => "COUNT(DISTINCT user_id)",
    }
}
