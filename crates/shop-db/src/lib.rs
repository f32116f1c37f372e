//! # shop-db
//!
//! Database layer implementing the `shop-core` repository traits with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations for the activity log and orders
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shop_db::{create_pool, DatabaseConfig, PgActivityLogRepository};
//! use shop_core::ActivityLogRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     let logs = PgActivityLogRepository::new(pool);
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgActivityLogRepository, PgOrderRepository};
