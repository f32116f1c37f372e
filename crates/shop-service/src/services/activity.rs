//! Activity log service
//!
//! Appends audit events on behalf of request handlers. Ingestion never fails
//! the caller: storage errors are logged and swallowed.

use serde_json::{json, Map, Value as JsonValue};
use tokio::task::JoinHandle;
use tracing::{error, instrument};

use shop_core::entities::{ActivityAction, ActivityEvent, ClientInfo, NewActivityEvent};
use shop_core::traits::ActivityLogRepository;

use super::context::ServiceContext;

/// Activity log service
pub struct ActivityLogService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ActivityLogService<'a> {
    /// Create a new ActivityLogService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Append one event.
    ///
    /// Returns `None` when the store rejected the write.
    #[instrument(skip(self, event), fields(user_id = %event.user_id, action = %event.action))]
    pub async fn log_activity(&self, event: NewActivityEvent) -> Option<ActivityEvent> {
        record(self.ctx.activity_repo(), &event).await
    }

    /// Append one event on a background task.
    ///
    /// The handle may be dropped; the write still runs to completion.
    pub fn spawn_log_activity(&self, event: NewActivityEvent) -> JoinHandle<Option<ActivityEvent>> {
        let repo = self.ctx.activity_repo_handle();
        tokio::spawn(async move { record(repo.as_ref(), &event).await })
    }

    // === Typed helpers ===

    /// Successful login, with the geolocated origin when known
    pub async fn log_login(
        &self,
        user_id: &str,
        client: &ClientInfo,
        country: Option<&str>,
        city: Option<&str>,
    ) -> Option<ActivityEvent> {
        let mut metadata = Map::new();
        if let Some(country) = country {
            metadata.insert("country".to_string(), json!(country));
        }
        if let Some(city) = city {
            metadata.insert("city".to_string(), json!(city));
        }

        self.log_activity(
            NewActivityEvent::new(user_id, ActivityAction::Login, client)
                .with_metadata(JsonValue::Object(metadata)),
        )
        .await
    }

    /// Rejected login attempt
    pub async fn log_login_failed(
        &self,
        user_id: &str,
        client: &ClientInfo,
        reason: &str,
    ) -> Option<ActivityEvent> {
        self.log_activity(
            NewActivityEvent::new(user_id, ActivityAction::LoginFailed, client)
                .with_metadata(json!({ "reason": reason })),
        )
        .await
    }

    pub async fn log_user_created(
        &self,
        user_id: &str,
        client: &ClientInfo,
        email: &str,
    ) -> Option<ActivityEvent> {
        self.log_activity(
            NewActivityEvent::new(user_id, ActivityAction::UserCreated, client)
                .with_metadata(json!({ "email": email })),
        )
        .await
    }

    pub async fn log_logout(&self, user_id: &str, client: &ClientInfo) -> Option<ActivityEvent> {
        self.log_activity(NewActivityEvent::new(user_id, ActivityAction::Logout, client))
            .await
    }

    /// Role change of `target_user_id`, recorded against the acting admin
    pub async fn log_role_changed(
        &self,
        admin_id: &str,
        client: &ClientInfo,
        target_user_id: &str,
        old_role: &str,
        new_role: &str,
    ) -> Option<ActivityEvent> {
        self.log_activity(
            NewActivityEvent::new(admin_id, ActivityAction::RoleChanged, client).with_metadata(
                json!({
                    "targetUserId": target_user_id,
                    "oldRole": old_role,
                    "newRole": new_role,
                }),
            ),
        )
        .await
    }

    pub async fn log_account_suspended(
        &self,
        admin_id: &str,
        client: &ClientInfo,
        target_user_id: &str,
        reason: Option<&str>,
    ) -> Option<ActivityEvent> {
        self.log_activity(
            NewActivityEvent::new(admin_id, ActivityAction::AccountSuspended, client)
                .with_metadata(json!({ "targetUserId": target_user_id, "reason": reason })),
        )
        .await
    }

    pub async fn log_account_activated(
        &self,
        admin_id: &str,
        client: &ClientInfo,
        target_user_id: &str,
    ) -> Option<ActivityEvent> {
        self.log_activity(
            NewActivityEvent::new(admin_id, ActivityAction::AccountActivated, client)
                .with_metadata(json!({ "targetUserId": target_user_id })),
        )
        .await
    }

    /// Profile edit; `changed_fields` lists the attribute names, never their values
    pub async fn log_profile_updated(
        &self,
        user_id: &str,
        client: &ClientInfo,
        changed_fields: &[&str],
    ) -> Option<ActivityEvent> {
        self.log_activity(
            NewActivityEvent::new(user_id, ActivityAction::ProfileUpdated, client)
                .with_metadata(json!({ "changedFields": changed_fields })),
        )
        .await
    }
}

async fn record(repo: &dyn ActivityLogRepository, event: &NewActivityEvent) -> Option<ActivityEvent> {
    match repo.insert(event).await {
        Ok(stored) => Some(stored),
        Err(e) => {
            error!(
                user_id = %event.user_id,
                action = %event.action,
                error = %e,
                "Failed to record activity"
            );
            None
        }
    }
}
