// In-memory storage implementation for dev mode
// Decision: Use parking_lot for thread-safe access
// Decision: UUIDs generated via uuid v7 (time-ordered)
//
// This implementation mirrors the PostgreSQL repository API backed by
// in-memory HashMaps, allowing the server to run without a database.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use taskdeck_core::CreateNotification;
use uuid::Uuid;

use super::models::*;

/// In-memory database for dev mode
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    users: RwLock<HashMap<Uuid, UserRow>>,
    notifications: RwLock<HashMap<Uuid, NotificationRow>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserRow> {
        let mut users = self.users.write();
        if users.values().any(|u| u.email == input.email) {
            bail!("User with email {} already exists", input.email);
        }

        let now = Self::now();
        let row = UserRow {
            id: input.id,
            email: input.email,
            name: input.name,
            created_at: now,
            updated_at: now,
        };
        users.insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        Ok(self.users.read().get(&id).cloned())
    }

    // ============================================
    // Notifications
    // ============================================

    pub async fn create_notification(&self, input: CreateNotification) -> Result<NotificationRow> {
        let now = Self::now();
        let row = NotificationRow {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            message: input.message,
            notification_type: input.notification_type.as_str().to_string(),
            is_read: false,
            is_active: true,
            related_task_id: input.related_task_id,
            related_project_id: input.related_project_id,
            triggered_by: input.triggered_by,
            created_at: now,
            updated_at: now,
        };
        self.notifications.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn get_notification(&self, id: Uuid) -> Result<Option<NotificationRow>> {
        Ok(self
            .notifications
            .read()
            .get(&id)
            .filter(|n| n.is_active)
            .cloned())
    }

    pub async fn list_notifications(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<NotificationRow>> {
        let mut rows = self.active_for_user(user_id, |_| true);
        rows.truncate(limit);
        Ok(rows)
    }

    pub async fn list_unread_notifications(&self, user_id: Uuid) -> Result<Vec<NotificationRow>> {
        Ok(self.active_for_user(user_id, |n| !n.is_read))
    }

    pub async fn count_unread_notifications(&self, user_id: Uuid) -> Result<u64> {
        let count = self
            .notifications
            .read()
            .values()
            .filter(|n| n.user_id == user_id && n.is_active && !n.is_read)
            .count();
        Ok(count as u64)
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> Result<Option<NotificationRow>> {
        let mut notifications = self.notifications.write();
        match notifications.get_mut(&id) {
            Some(n) if n.is_active => {
                if !n.is_read {
                    n.is_read = true;
                    n.updated_at = Self::now();
                }
                Ok(Some(n.clone()))
            }
            _ => Ok(None),
        }
    }

    pub async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64> {
        let now = Self::now();
        let mut updated = 0;
        for n in self.notifications.write().values_mut() {
            if n.user_id == user_id && n.is_active && !n.is_read {
                n.is_read = true;
                n.updated_at = now;
                updated += 1;
            }
        }
        Ok(updated)
    }

    pub async fn deactivate_notification(&self, id: Uuid) -> Result<bool> {
        let mut notifications = self.notifications.write();
        match notifications.get_mut(&id) {
            Some(n) if n.is_active => {
                n.is_active = false;
                n.updated_at = Self::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// A user's active rows matching `filter`, newest first
    fn active_for_user(
        &self,
        user_id: Uuid,
        filter: impl Fn(&NotificationRow) -> bool,
    ) -> Vec<NotificationRow> {
        let mut rows: Vec<_> = self
            .notifications
            .read()
            .values()
            .filter(|n| n.user_id == user_id && n.is_active && filter(n))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_core::NotificationType;

    fn draft(user_id: Uuid, kind: NotificationType) -> CreateNotification {
        CreateNotification::new(user_id, kind)
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_limited() {
        let db = InMemoryDatabase::new();
        let user = Uuid::now_v7();
        let first = db
            .create_notification(draft(user, NotificationType::TaskAssigned))
            .await
            .unwrap();
        let second = db
            .create_notification(draft(user, NotificationType::TaskDue))
            .await
            .unwrap();
        let third = db
            .create_notification(draft(user, NotificationType::CommentAdded))
            .await
            .unwrap();
        db.create_notification(draft(Uuid::now_v7(), NotificationType::TaskDue))
            .await
            .unwrap();

        let rows = db.list_notifications(user, 10).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let rows = db.list_notifications(user, 2).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, third.id);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_record() {
        let db = InMemoryDatabase::new();
        let user = Uuid::now_v7();
        let row = db.create_notification(draft(user, NotificationType::TaskDue)).await.unwrap();

        assert!(db.deactivate_notification(row.id).await.unwrap());
        assert!(!db.deactivate_notification(row.id).await.unwrap());
        assert!(db.get_notification(row.id).await.unwrap().is_none());
        assert!(db.mark_notification_read(row.id).await.unwrap().is_none());
        assert!(db.list_notifications(user, 10).await.unwrap().is_empty());
        assert_eq!(db.count_unread_notifications(user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mark_all_only_touches_active_unread_rows_of_user() {
        let db = InMemoryDatabase::new();
        let user = Uuid::now_v7();
        let other = Uuid::now_v7();
        let read = db.create_notification(draft(user, NotificationType::TaskDue)).await.unwrap();
        db.mark_notification_read(read.id).await.unwrap();
        let deleted = db.create_notification(draft(user, NotificationType::TaskDue)).await.unwrap();
        db.deactivate_notification(deleted.id).await.unwrap();
        db.create_notification(draft(user, NotificationType::TaskAssigned)).await.unwrap();
        db.create_notification(draft(user, NotificationType::CommentAdded)).await.unwrap();
        db.create_notification(draft(other, NotificationType::CommentAdded)).await.unwrap();

        assert_eq!(db.mark_all_notifications_read(user).await.unwrap(), 2);
        assert_eq!(db.mark_all_notifications_read(user).await.unwrap(), 0);
        assert_eq!(db.count_unread_notifications(other).await.unwrap(), 1);
        assert!(!db.notifications.read()[&deleted.id].is_read);
    }

    #[tokio::test]
    async fn test_duplicate_user_email_rejected() {
        let db = InMemoryDatabase::new();
        let input = CreateUserRow {
            id: Uuid::now_v7(),
            email: "jo@example.com".to_string(),
            name: "Jo".to_string(),
        };
        db.create_user(input.clone()).await.unwrap();

        let dup = CreateUserRow {
            id: Uuid::now_v7(),
            ..input
        };
        assert!(db.create_user(dup).await.is_err());
    }
}
