//! Security alert service
//!
//! Runs every detector against one shared instant, merges their output into
//! a single feed ordered by severity, and records analyst dismissals.

pub mod detectors;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, instrument};
use validator::Validate;

use shop_core::entities::{ActivityAction, AlertSummary, AlertType, NewActivityEvent, SecurityAlert};

use crate::dto::{DismissAlertRequest, DismissAlertResponse, SecurityAlertFeed};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Security alert service
pub struct SecurityAlertService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SecurityAlertService<'a> {
    /// Create a new SecurityAlertService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Current alerts, most severe first
    pub async fn get_all_security_alerts(&self) -> ServiceResult<Vec<SecurityAlert>> {
        self.get_all_security_alerts_at(Utc::now()).await
    }

    /// Alerts as of `now`.
    ///
    /// All five detectors run concurrently. If any of them fails the whole
    /// call fails; partial feeds are never returned. Within one severity,
    /// alerts keep detector order.
    #[instrument(skip(self))]
    pub async fn get_all_security_alerts_at(
        &self,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<SecurityAlert>> {
        let logs = self.ctx.activity_repo();
        let orders = self.ctx.order_repo();
        let thresholds = self.ctx.thresholds();

        let (failed_logins, unusual_locations, rapid_accounts, high_value, rapid_orders) = tokio::try_join!(
            detectors::detect_failed_logins(logs, thresholds, now),
            detectors::detect_unusual_locations(logs, thresholds, now),
            detectors::detect_rapid_account_creation(logs, thresholds, now),
            detectors::detect_high_value_new_accounts(orders, thresholds, now),
            detectors::detect_rapid_orders(orders, thresholds, now),
        )?;

        let mut alerts: Vec<SecurityAlert> = failed_logins
            .into_iter()
            .chain(unusual_locations)
            .chain(rapid_accounts)
            .chain(high_value)
            .chain(rapid_orders)
            .collect();
        alerts.sort_by_key(|alert| alert.severity.rank());

        info!(
            total = alerts.len(),
            failed_login = AlertSummary::count_of(&alerts, AlertType::FailedLogin),
            unusual_location = AlertSummary::count_of(&alerts, AlertType::UnusualLocation),
            rapid_account_creation = AlertSummary::count_of(&alerts, AlertType::RapidAccountCreation),
            high_value_new_account = AlertSummary::count_of(&alerts, AlertType::HighValueNewAccount),
            rapid_orders = AlertSummary::count_of(&alerts, AlertType::RapidOrders),
            "Security alerts generated"
        );

        Ok(alerts)
    }

    /// Current alerts together with their per-severity summary
    pub async fn get_alert_feed(&self) -> ServiceResult<SecurityAlertFeed> {
        let now = Utc::now();
        let alerts = self.get_all_security_alerts_at(now).await?;
        Ok(SecurityAlertFeed::new(alerts, now))
    }

    /// Record an analyst's dismissal in the activity log.
    ///
    /// This is an audit entry only: the alert is recomputed from raw events
    /// and will reappear on the next call while its condition still holds.
    /// Unlike ingestion, a failed write is returned to the caller.
    #[instrument(skip(self, request), fields(alert_type = %request.alert_type, dismissed_by = %request.dismissed_by))]
    pub async fn dismiss_security_alert(
        &self,
        request: DismissAlertRequest,
    ) -> ServiceResult<DismissAlertResponse> {
        request.validate()?;

        let dismissed_at = Utc::now();
        let event = NewActivityEvent {
            user_id: request.dismissed_by.clone(),
            action: ActivityAction::SecurityAlertDismissed,
            metadata: Some(json!({
                "alertType": request.alert_type,
                "targetUserId": request.user_id,
                "targetIpAddress": request.ip_address,
                "reason": request.reason,
                "dismissedBy": request.dismissed_by,
                "dismissedByIp": request.dismissed_by_ip,
                "dismissedAt": dismissed_at.to_rfc3339(),
            })),
            ip_address: request.dismissed_by_ip,
            user_agent: request.dismissed_by_user_agent,
        };

        let stored = self.ctx.activity_repo().insert(&event).await?;
        info!(event_id = %stored.id, "Security alert dismissed");

        Ok(DismissAlertResponse {
            success: true,
            message: "Alert dismissed successfully".to_string(),
        })
    }
}
