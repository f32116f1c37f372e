//! Data transfer objects for the dashboard layer

mod requests;
mod responses;

pub use requests::DismissAlertRequest;
pub use responses::{DismissAlertResponse, SecurityAlertFeed};
