// Notification entity
//
// A Notification is one alert for one user. It is created exactly once per
// handled event, and afterwards only its read flag or active flag change.
// Records are never hard-deleted; `is_active = false` is a soft delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::Error;

/// Default page size for listing a user's notifications
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Kind of notification, one per event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    TaskAssigned,
    TaskDue,
    CommentAdded,
    ProjectInvite,
    TaskCompleted,
}

impl NotificationType {
    pub const ALL: [NotificationType; 5] = [
        NotificationType::TaskAssigned,
        NotificationType::TaskDue,
        NotificationType::CommentAdded,
        NotificationType::ProjectInvite,
        NotificationType::TaskCompleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::TaskAssigned => "task_assigned",
            NotificationType::TaskDue => "task_due",
            NotificationType::CommentAdded => "comment_added",
            NotificationType::ProjectInvite => "project_invite",
            NotificationType::TaskCompleted => "task_completed",
        }
    }

    /// Canned message stored on the notification record
    pub fn default_message(&self) -> &'static str {
        match self {
            NotificationType::TaskAssigned => "A new task has been assigned to you.",
            NotificationType::TaskDue => "A task assigned to you is coming due.",
            NotificationType::CommentAdded => "A new comment was added to your task.",
            NotificationType::ProjectInvite => "You have been invited to a new project.",
            NotificationType::TaskCompleted => "A task you created has been completed.",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::store(format!("Unknown notification type: {}", s)))
    }
}

/// Persisted notification for a single recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Notification {
    /// Unique notification ID (UUID v7)
    pub id: Uuid,
    /// Recipient user
    pub user_id: Uuid,
    /// Human-readable message
    pub message: String,
    /// Notification kind
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// Whether the recipient has read it
    pub is_read: bool,
    /// False once soft-deleted
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_task_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_project_id: Option<Uuid>,
    /// User whose action produced this notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggered_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// Materialize a draft without storing it.
    ///
    /// Used when persistence fails but the real-time push should still go out.
    pub fn transient(input: CreateNotification) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            message: input.message,
            notification_type: input.notification_type,
            is_read: false,
            is_active: true,
            related_task_id: input.related_task_id,
            related_project_id: input.related_project_id,
            triggered_by: input.triggered_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateNotification {
    pub user_id: Uuid,
    pub message: String,
    pub notification_type: NotificationType,
    pub related_task_id: Option<Uuid>,
    pub related_project_id: Option<Uuid>,
    pub triggered_by: Option<Uuid>,
}

impl CreateNotification {
    /// Draft with the canned message for the given type
    pub fn new(user_id: Uuid, notification_type: NotificationType) -> Self {
        Self {
            user_id,
            message: notification_type.default_message().to_string(),
            notification_type,
            related_task_id: None,
            related_project_id: None,
            triggered_by: None,
        }
    }

    pub fn with_task(mut self, task_id: Uuid) -> Self {
        self.related_task_id = Some(task_id);
        self
    }

    pub fn with_project(mut self, project_id: Uuid) -> Self {
        self.related_project_id = Some(project_id);
        self
    }

    pub fn with_triggered_by(mut self, user_id: Uuid) -> Self {
        self.triggered_by = Some(user_id);
        self
    }
}
