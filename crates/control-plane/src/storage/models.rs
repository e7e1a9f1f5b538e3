// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use taskdeck_core::{Notification, NotificationType, UserProfile};
use uuid::Uuid;

// ============================================
// Users
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        UserProfile {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}

// ============================================
// Notifications
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub notification_type: String,
    pub is_read: bool,
    pub is_active: bool,
    pub related_task_id: Option<Uuid>,
    pub related_project_id: Option<Uuid>,
    pub triggered_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = taskdeck_core::Error;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let notification_type: NotificationType = row.notification_type.parse()?;
        Ok(Notification {
            id: row.id,
            user_id: row.user_id,
            message: row.message,
            notification_type,
            is_read: row.is_read,
            is_active: row.is_active,
            related_task_id: row.related_task_id,
            related_project_id: row.related_project_id,
            triggered_by: row.triggered_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
