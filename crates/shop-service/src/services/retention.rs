//! Retention sweep
//!
//! Flags old activity rows as archived. Rows are never deleted.

use chrono::{Duration, Utc};
use shop_common::MAX_DAYS_TO_KEEP;
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Age, in days, past which a row is archived when nothing else is configured
pub const DEFAULT_DAYS_TO_KEEP: i64 = 90;

/// Retention service
pub struct RetentionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RetentionService<'a> {
    /// Create a new RetentionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Archive every non-archived row older than `days_to_keep` days.
    ///
    /// Returns the number of rows flagged by this run. Running it twice in a
    /// row archives nothing the second time. `days_to_keep` must lie in
    /// `1..=MAX_DAYS_TO_KEEP`.
    #[instrument(skip(self))]
    pub async fn archive_old_logs(&self, days_to_keep: i64) -> ServiceResult<u64> {
        if !(1..=MAX_DAYS_TO_KEEP).contains(&days_to_keep) {
            return Err(ServiceError::validation(format!(
                "days_to_keep must be between 1 and {MAX_DAYS_TO_KEEP}"
            )));
        }

        let cutoff = Duration::try_days(days_to_keep)
            .and_then(|keep| Utc::now().checked_sub_signed(keep))
            .ok_or_else(|| ServiceError::validation("days_to_keep is out of range"))?;
        let archived = self.ctx.activity_repo().mark_archived_before(cutoff).await?;

        info!(archived, %cutoff, "Archived old activity logs");
        Ok(archived)
    }

    /// Archive using the configured retention period
    pub async fn archive_with_configured_retention(&self) -> ServiceResult<u64> {
        self.archive_old_logs(self.ctx.retention().days_to_keep).await
    }
}
