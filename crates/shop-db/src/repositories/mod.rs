//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in shop-core.

mod activity_log;
mod error;
mod filters;
mod order;

pub use activity_log::PgActivityLogRepository;
pub use order::PgOrderRepository;
