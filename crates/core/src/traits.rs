// Core traits for pluggable backends
//
// These traits allow the notification pipeline to work with different
// storage, real-time and mail backends:
// - NotificationStore: Postgres in production, in-memory for dev and tests
// - RealtimePublisher: WebSocket gateway, or a recording double in tests
// - Mailer: SMTP transport, or a log-only transport when mail is disabled
// - UserDirectory: resolves display names and emails for event payloads

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::notification::{CreateNotification, Notification};

// ============================================================================
// NotificationStore
// ============================================================================

/// Trait for persisting and querying notifications
///
/// All queries only see active (not soft-deleted) records.
/// Listings are ordered newest first.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Insert a new notification (unread, active)
    async fn create_notification(&self, input: CreateNotification) -> Result<Notification>;

    /// Get an active notification by id
    async fn get_notification(&self, id: Uuid) -> Result<Option<Notification>>;

    /// List a user's active notifications, newest first, at most `limit`
    async fn list_notifications(&self, user_id: Uuid, limit: usize) -> Result<Vec<Notification>>;

    /// List a user's active unread notifications, newest first
    async fn list_unread_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>>;

    /// Count a user's active unread notifications
    async fn count_unread_notifications(&self, user_id: Uuid) -> Result<u64>;

    /// Set `is_read` on an active notification. Returns None if there is none.
    async fn mark_notification_read(&self, id: Uuid) -> Result<Option<Notification>>;

    /// Set `is_read` on all of a user's active unread notifications.
    /// Returns the number of rows changed.
    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64>;

    /// Clear `is_active`. Returns false if there was no active record.
    async fn deactivate_notification(&self, id: Uuid) -> Result<bool>;
}

// ============================================================================
// RealtimePublisher
// ============================================================================

/// Trait for pushing notifications to connected clients
#[async_trait]
pub trait RealtimePublisher: Send + Sync {
    /// Deliver to every session in the user's room.
    /// Returns the number of sessions reached; zero is not an error.
    async fn send_notification_to_user(
        &self,
        user_id: Uuid,
        notification: &Notification,
    ) -> Result<usize>;

    /// Deliver to every session that joined the project's room
    async fn send_notification_to_project(
        &self,
        project_id: &str,
        notification: &Notification,
    ) -> Result<usize>;
}

// ============================================================================
// Mailer
// ============================================================================

/// A rendered email ready for transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Trait for email transports
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;

    /// Name for logs
    fn name(&self) -> &'static str {
        "Mailer"
    }
}

// ============================================================================
// UserDirectory
// ============================================================================

/// Display data for a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Trait for resolving users referenced by domain events
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Result<Option<UserProfile>>;
}
