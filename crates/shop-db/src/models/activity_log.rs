//! Activity log database models

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for activity_logs table
#[derive(Debug, Clone, FromRow)]
pub struct ActivityLogModel {
    pub id: Uuid,
    pub user_id: String,
    /// Stored as the SCREAMING_SNAKE_CASE action name
    pub action: String,
    pub metadata: JsonValue,
    pub ip_address: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
    pub archived: bool,
}

/// One row of a `GROUP BY ... HAVING COUNT(*) >= n` query
#[derive(Debug, Clone, FromRow)]
pub struct GroupCountModel {
    pub key: String,
    pub count: i64,
}
