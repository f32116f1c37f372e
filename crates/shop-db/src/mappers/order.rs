//! Order model <-> entity mapper

use shop_core::entities::{CustomerProfile, Order};

use crate::models::{CustomerProfileModel, OrderModel};

impl From<OrderModel> for Order {
    fn from(model: OrderModel) -> Self {
        Order {
            id: model.id,
            user_id: model.user_id,
            total: model.total,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

impl From<CustomerProfileModel> for CustomerProfile {
    fn from(model: CustomerProfileModel) -> Self {
        CustomerProfile {
            user_id: model.user_id,
            account_created_at: model.account_created_at,
            order_count: model.order_count,
        }
    }
}
