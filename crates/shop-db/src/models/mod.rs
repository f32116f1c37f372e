//! Database models - SQLx-compatible structs for PostgreSQL rows

mod activity_log;
mod order;

pub use activity_log::{ActivityLogModel, GroupCountModel};
pub use order::{CustomerProfileModel, OrderModel};
