// Notification service for business logic
//
// Read and management operations behind the HTTP API. Creation happens
// only in the listener, one record per handled event.

use std::sync::Arc;
#[cfg(test)]
use taskdeck_core::CreateNotification;
use taskdeck_core::{Error, Notification, NotificationStore, Result, DEFAULT_LIST_LIMIT};
use uuid::Uuid;

pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    default_limit: usize,
}

impl NotificationService {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self {
            store,
            default_limit: DEFAULT_LIST_LIMIT,
        }
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    /// Seed a notification directly; production records come from the listener
    #[cfg(test)]
    pub(crate) async fn create(&self, input: CreateNotification) -> Result<Notification> {
        self.store.create_notification(input).await
    }

    /// Active notification by id
    pub async fn get(&self, id: Uuid) -> Result<Notification> {
        self.store
            .get_notification(id)
            .await?
            .ok_or_else(|| Error::notification_not_found(id))
    }

    /// A user's active notifications, newest first
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<Notification>> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(self.default_limit);
        self.store.list_notifications(user_id, limit).await
    }

    pub async fn find_unread_by_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        self.store.list_unread_notifications(user_id).await
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<u64> {
        self.store.count_unread_notifications(user_id).await
    }

    /// Mark one notification read. Marking an already-read one is a no-op.
    pub async fn mark_as_read(&self, id: Uuid) -> Result<Notification> {
        let notification = self
            .store
            .mark_notification_read(id)
            .await?
            .ok_or_else(|| Error::notification_not_found(id))?;
        tracing::debug!(notification_id = %id, "Notification marked as read");
        Ok(notification)
    }

    /// Mark all of a user's unread notifications read; returns how many changed
    pub async fn mark_all_as_read(&self, user_id: Uuid) -> Result<u64> {
        let updated = self.store.mark_all_notifications_read(user_id).await?;
        tracing::debug!(user_id = %user_id, updated, "Notifications marked as read");
        Ok(updated)
    }

    /// Soft delete
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.deactivate_notification(id).await? {
            return Err(Error::notification_not_found(id));
        }
        tracing::debug!(notification_id = %id, "Notification deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageBackend;
    use taskdeck_core::NotificationType;

    fn service() -> NotificationService {
        NotificationService::new(Arc::new(StorageBackend::in_memory()))
    }

    async fn seed(service: &NotificationService, user: Uuid, count: usize) -> Vec<Notification> {
        let mut created = Vec::new();
        for _ in 0..count {
            created.push(
                service
                    .create(CreateNotification::new(user, NotificationType::TaskAssigned))
                    .await
                    .unwrap(),
            );
        }
        created
    }

    #[tokio::test]
    async fn test_find_by_user_applies_default_limit() {
        let service = service().with_default_limit(3);
        let user = Uuid::now_v7();
        let created = seed(&service, user, 5).await;

        let listed = service.find_by_user(user, None).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].id, created[4].id);

        let listed = service.find_by_user(user, Some(10)).await.unwrap();
        assert_eq!(listed.len(), 5);

        let listed = service.find_by_user(user, Some(0)).await.unwrap();
        assert_eq!(listed.len(), 3);
    }

    #[tokio::test]
    async fn test_mark_as_read_is_idempotent() {
        let service = service();
        let user = Uuid::now_v7();
        let created = seed(&service, user, 2).await;

        let first = service.mark_as_read(created[0].id).await.unwrap();
        let second = service.mark_as_read(created[0].id).await.unwrap();
        assert!(first.is_read);
        assert_eq!(first.updated_at, second.updated_at);
        assert_eq!(service.unread_count(user).await.unwrap(), 1);

        let unread = service.find_unread_by_user(user).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].id, created[1].id);
    }

    #[tokio::test]
    async fn test_missing_notification_is_not_found() {
        let service = service();
        let id = Uuid::now_v7();

        assert!(service.mark_as_read(id).await.unwrap_err().is_not_found());
        assert!(service.delete(id).await.unwrap_err().is_not_found());
        assert!(service.get(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_unknown_id_stays_not_found_on_repeat() {
        let service = service();
        let user = Uuid::now_v7();
        seed(&service, user, 1).await;
        let id = Uuid::now_v7();

        for _ in 0..2 {
            let err = service.mark_as_read(id).await.unwrap_err();
            assert!(matches!(err, Error::NotFound(_)));
        }
        assert_eq!(service.unread_count(user).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_then_operations_fail() {
        let service = service();
        let user = Uuid::now_v7();
        let created = seed(&service, user, 1).await;

        service.delete(created[0].id).await.unwrap();

        assert!(service.delete(created[0].id).await.unwrap_err().is_not_found());
        assert!(service.mark_as_read(created[0].id).await.unwrap_err().is_not_found());
        assert!(service.find_by_user(user, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_all_as_read_counts_changes() {
        let service = service();
        let user = Uuid::now_v7();
        seed(&service, user, 3).await;

        assert_eq!(service.mark_all_as_read(user).await.unwrap(), 3);
        assert_eq!(service.mark_all_as_read(user).await.unwrap(), 0);
        assert_eq!(service.unread_count(user).await.unwrap(), 0);
    }
}
