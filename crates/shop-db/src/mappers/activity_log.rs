//! Activity log model <-> entity mapper

use serde_json::{Map, Value as JsonValue};
use shop_core::entities::{ActivityAction, ActivityEvent};
use shop_core::error::DomainError;
use shop_core::traits::GroupCount;

use crate::models::{ActivityLogModel, GroupCountModel};

impl TryFrom<ActivityLogModel> for ActivityEvent {
    type Error = DomainError;

    fn try_from(model: ActivityLogModel) -> Result<Self, Self::Error> {
        Ok(ActivityEvent {
            id: model.id,
            user_id: model.user_id,
            action: model.action.parse::<ActivityAction>()?,
            metadata: model.metadata,
            ip_address: model.ip_address,
            user_agent: model.user_agent,
            created_at: model.created_at,
            archived: model.archived,
        })
    }
}

impl From<GroupCountModel> for GroupCount {
    fn from(model: GroupCountModel) -> Self {
        GroupCount {
            key: model.key,
            count: model.count,
        }
    }
}

/// The metadata column is NOT NULL; absent payloads are stored as `{}`
pub fn metadata_or_empty(metadata: Option<&JsonValue>) -> JsonValue {
    metadata
        .cloned()
        .unwrap_or_else(|| JsonValue::Object(Map::new()))
}
