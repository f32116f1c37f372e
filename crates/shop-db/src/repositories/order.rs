//! PostgreSQL implementation of OrderRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use shop_core::entities::{CustomerProfile, Order};
use shop_core::traits::{OrderQuery, OrderRepository, RepoResult};

use crate::models::{CustomerProfileModel, OrderModel};

use super::error::map_db_error;
use super::filters::{push_order_filters, ORDER_COLUMNS};

/// PostgreSQL implementation of OrderRepository (read-only)
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new PgOrderRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    #[instrument(skip(self))]
    async fn find_orders(&self, query: &OrderQuery) -> RepoResult<Vec<Order>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(ORDER_COLUMNS);
        builder.push(" FROM orders WHERE TRUE");
        push_order_filters(&mut builder, query);
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build_query_as::<OrderModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_customer_profile(&self, user_id: &str) -> RepoResult<Option<CustomerProfile>> {
        let result = sqlx::query_as::<_, CustomerProfileModel>(
            r"
            SELECT u.id AS user_id,
                   u.created_at AS account_created_at,
                   (SELECT COUNT(*) FROM orders o WHERE o.user_id = u.id) AS order_count
            FROM users u
            WHERE u.id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(CustomerProfile::from))
    }
}
