//! Order database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the fraud-relevant columns of the orders table
#[derive(Debug, Clone, FromRow)]
pub struct OrderModel {
    pub id: String,
    pub user_id: String,
    pub total: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// users row joined with the customer's lifetime order count
#[derive(Debug, Clone, FromRow)]
pub struct CustomerProfileModel {
    pub user_id: String,
    pub account_created_at: DateTime<Utc>,
    pub order_count: i64,
}
