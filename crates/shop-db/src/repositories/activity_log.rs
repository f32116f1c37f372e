//! PostgreSQL implementation of ActivityLogRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use shop_core::entities::{ActivityEvent, NewActivityEvent};
use shop_core::traits::{ActivityLogRepository, CountMode, EventQuery, GroupCount, GroupKey, RepoResult};

use crate::mappers::metadata_or_empty;
use crate::models::{ActivityLogModel, GroupCountModel};

use super::error::map_db_error;
use super::filters::{count_expr, group_column, push_event_filters, ACTIVITY_COLUMNS};

/// PostgreSQL implementation of ActivityLogRepository
#[derive(Clone)]
pub struct PgActivityLogRepository {
    pool: PgPool,
}

impl PgActivityLogRepository {
    /// Create a new PgActivityLogRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLogRepository for PgActivityLogRepository {
    #[instrument(skip(self))]
    async fn find_events(&self, query: &EventQuery) -> RepoResult<Vec<ActivityEvent>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(ACTIVITY_COLUMNS);
        builder.push(" FROM activity_logs WHERE TRUE");
        push_event_filters(&mut builder, query);
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build_query_as::<ActivityLogModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        rows.into_iter().map(ActivityEvent::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn count_grouped(
        &self,
        query: &EventQuery,
        group_by: GroupKey,
        mode: CountMode,
        min_count: i64,
    ) -> RepoResult<Vec<GroupCount>> {
        let mut builder = grouped_count_query(query, group_by, mode, min_count);
        let rows = builder
            .build_query_as::<GroupCountModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(GroupCount::from).collect())
    }

    #[instrument(skip(self, event), fields(user_id = %event.user_id, action = %event.action))]
    async fn insert(&self, event: &NewActivityEvent) -> RepoResult<ActivityEvent> {
        let sql = format!(
            r"
            INSERT INTO activity_logs (user_id, action, metadata, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ACTIVITY_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, ActivityLogModel>(&sql)
            .bind(&event.user_id)
            .bind(event.action.as_str())
            .bind(metadata_or_empty(event.metadata.as_ref()))
            .bind(&event.ip_address)
            .bind(&event.user_agent)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        ActivityEvent::try_from(row)
    }

    #[instrument(skip(self))]
    async fn mark_archived_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE activity_logs
            SET archived = TRUE
            WHERE archived = FALSE AND created_at < $1
            ",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}

fn grouped_count_query<'a>(
    query: &EventQuery,
    group_by: GroupKey,
    mode: CountMode,
    min_count: i64,
) -> QueryBuilder<'a, Postgres> {
    let column = group_column(group_by);
    let count = count_expr(mode);

    let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
    builder.push(column);
    builder.push(" AS key, ");
    builder.push(count);
    builder.push(" AS count FROM activity_logs WHERE TRUE");
    push_event_filters(&mut builder, query);
    builder.push(" GROUP BY ");
    builder.push(column);
    builder.push(" HAVING ");
    builder.push(count);
    builder.push(" >= ").push_bind(min_count);
    builder.push(" ORDER BY count DESC, key ASC");
    builder
}
