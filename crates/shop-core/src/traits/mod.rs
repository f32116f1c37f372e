//! Repository traits and the query shapes they accept

mod repositories;

pub use repositories::{
    ActivityLogRepository, CountMode, EventQuery, GroupCount, GroupKey, LowerBound, OrderQuery,
    OrderRepository, RepoResult, TimeRange,
};
