//! Model to entity mappers
//!
//! `TryFrom<ActivityLogModel>` rejects unknown action strings; order rows map
//! infallibly.

mod activity_log;
mod order;

pub use activity_log::metadata_or_empty;
