//! Per-user notification feed entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{NotificationId, UserId};

/// Category tag stored in the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    WorkspaceInvite,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WorkspaceInvite => "workspace_invite",
        }
    }
}

/// Feed entry as shown to its recipient.
///
/// `kind` is kept as the raw stored tag so entries written by newer releases
/// still list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    #[schema(example = "workspace_invite")]
    pub kind: String,
    pub title: String,
    pub message: String,
    #[schema(value_type = Object)]
    pub meta: Value,
    pub is_read: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

/// Entry to append to a recipient's feed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub meta: Value,
}
