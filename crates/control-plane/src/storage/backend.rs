// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// This module provides a unified StorageBackend enum that can work with
// either PostgreSQL (production) or in-memory (dev mode) storage, and
// exposes it to the pipeline through the core store traits.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use taskdeck_core::{
    CreateNotification, Error, Notification, NotificationStore, UserDirectory, UserProfile,
};
use uuid::Uuid;

use super::memory::InMemoryDatabase;
use super::models::*;
use super::repositories::Database;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Connect to PostgreSQL and apply migrations
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        db.migrate().await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    // ============================================
    // Users
    // ============================================

    /// Seed a user profile. Runtime code only reads users; this exists for
    /// dev databases and tests.
    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserRow> {
        match self {
            Self::Postgres(db) => db.create_user(input).await,
            Self::InMemory(db) => db.create_user(input).await,
        }
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user(id).await,
            Self::InMemory(db) => db.get_user(id).await,
        }
    }

    // ============================================
    // Notifications
    // ============================================

    pub async fn create_notification(&self, input: CreateNotification) -> Result<NotificationRow> {
        match self {
            Self::Postgres(db) => db.create_notification(input).await,
            Self::InMemory(db) => db.create_notification(input).await,
        }
    }

    pub async fn get_notification(&self, id: Uuid) -> Result<Option<NotificationRow>> {
        match self {
            Self::Postgres(db) => db.get_notification(id).await,
            Self::InMemory(db) => db.get_notification(id).await,
        }
    }

    pub async fn list_notifications(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<NotificationRow>> {
        match self {
            Self::Postgres(db) => db.list_notifications(user_id, limit).await,
            Self::InMemory(db) => db.list_notifications(user_id, limit).await,
        }
    }

    pub async fn list_unread_notifications(&self, user_id: Uuid) -> Result<Vec<NotificationRow>> {
        match self {
            Self::Postgres(db) => db.list_unread_notifications(user_id).await,
            Self::InMemory(db) => db.list_unread_notifications(user_id).await,
        }
    }

    pub async fn count_unread_notifications(&self, user_id: Uuid) -> Result<u64> {
        match self {
            Self::Postgres(db) => db.count_unread_notifications(user_id).await,
            Self::InMemory(db) => db.count_unread_notifications(user_id).await,
        }
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> Result<Option<NotificationRow>> {
        match self {
            Self::Postgres(db) => db.mark_notification_read(id).await,
            Self::InMemory(db) => db.mark_notification_read(id).await,
        }
    }

    pub async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64> {
        match self {
            Self::Postgres(db) => db.mark_all_notifications_read(user_id).await,
            Self::InMemory(db) => db.mark_all_notifications_read(user_id).await,
        }
    }

    pub async fn deactivate_notification(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.deactivate_notification(id).await,
            Self::InMemory(db) => db.deactivate_notification(id).await,
        }
    }
}

// ============================================
// Core trait implementations
// ============================================

fn store_err(e: anyhow::Error) -> Error {
    Error::store(format!("{:#}", e))
}

fn rows_to_notifications(rows: Vec<NotificationRow>) -> taskdeck_core::Result<Vec<Notification>> {
    rows.into_iter().map(Notification::try_from).collect()
}

#[async_trait]
impl NotificationStore for StorageBackend {
    async fn create_notification(
        &self,
        input: CreateNotification,
    ) -> taskdeck_core::Result<Notification> {
        let row = StorageBackend::create_notification(self, input)
            .await
            .map_err(store_err)?;
        Notification::try_from(row)
    }

    async fn get_notification(&self, id: Uuid) -> taskdeck_core::Result<Option<Notification>> {
        StorageBackend::get_notification(self, id)
            .await
            .map_err(store_err)?
            .map(Notification::try_from)
            .transpose()
    }

    async fn list_notifications(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> taskdeck_core::Result<Vec<Notification>> {
        let rows = StorageBackend::list_notifications(self, user_id, limit)
            .await
            .map_err(store_err)?;
        rows_to_notifications(rows)
    }

    async fn list_unread_notifications(
        &self,
        user_id: Uuid,
    ) -> taskdeck_core::Result<Vec<Notification>> {
        let rows = StorageBackend::list_unread_notifications(self, user_id)
            .await
            .map_err(store_err)?;
        rows_to_notifications(rows)
    }

    async fn count_unread_notifications(&self, user_id: Uuid) -> taskdeck_core::Result<u64> {
        StorageBackend::count_unread_notifications(self, user_id)
            .await
            .map_err(store_err)
    }

    async fn mark_notification_read(
        &self,
        id: Uuid,
    ) -> taskdeck_core::Result<Option<Notification>> {
        StorageBackend::mark_notification_read(self, id)
            .await
            .map_err(store_err)?
            .map(Notification::try_from)
            .transpose()
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> taskdeck_core::Result<u64> {
        StorageBackend::mark_all_notifications_read(self, user_id)
            .await
            .map_err(store_err)
    }

    async fn deactivate_notification(&self, id: Uuid) -> taskdeck_core::Result<bool> {
        StorageBackend::deactivate_notification(self, id)
            .await
            .map_err(store_err)
    }
}

#[async_trait]
impl UserDirectory for StorageBackend {
    async fn get_user(&self, id: Uuid) -> taskdeck_core::Result<Option<UserProfile>> {
        Ok(StorageBackend::get_user(self, id)
            .await
            .map_err(store_err)?
            .map(UserProfile::from))
    }
}
