// Notification Events
//
// This module defines the five events that produce notifications.
// Each event carries the ids and denormalized display strings captured at
// emission time, so a handler can render a notification and an email
// without looking anything else up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::notification::{CreateNotification, NotificationType};

// ============================================================================
// Event Name Constants
// ============================================================================

pub const TASK_ASSIGNED: &str = "task.assigned";
pub const TASK_DUE: &str = "task.due";
pub const COMMENT_ADDED: &str = "comment.added";
pub const PROJECT_INVITE: &str = "project.invite";
pub const TASK_COMPLETED: &str = "task.completed";

/// All event names, in declaration order
pub const ALL_EVENT_NAMES: [&str; 5] = [
    TASK_ASSIGNED,
    TASK_DUE,
    COMMENT_ADDED,
    PROJECT_INVITE,
    TASK_COMPLETED,
];

// ============================================================================
// Event Payloads
// ============================================================================

/// A user was assigned to a task by someone else
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TaskAssignedEvent {
    pub assignee_id: Uuid,
    pub task_id: Uuid,
    pub task_title: String,
    pub assigned_by: Uuid,
    pub assigner_name: String,
    pub assignee_email: String,
}

/// A task assigned to the user is coming due
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TaskDueEvent {
    pub user_id: Uuid,
    pub task_id: Uuid,
    pub task_title: String,
    pub due_date: DateTime<Utc>,
    pub user_email: String,
}

/// Someone commented on a task the user created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CommentAddedEvent {
    pub task_creator_id: Uuid,
    pub task_id: Uuid,
    pub task_title: String,
    pub comment_author: Uuid,
    pub comment_author_name: String,
    pub task_creator_email: String,
}

/// The user was added to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ProjectInviteEvent {
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub project_name: String,
    pub invited_by: Uuid,
    pub inviter_name: String,
    pub user_email: String,
}

/// Someone else completed a task the user created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TaskCompletedEvent {
    pub task_creator_id: Uuid,
    pub task_id: Uuid,
    pub task_title: String,
    pub completed_by: Uuid,
    pub completer_name: String,
    pub task_creator_email: String,
}

// ============================================================================
// NotificationEvent
// ============================================================================

/// Any notification-producing event.
///
/// Serialized as `{"type": "<event name>", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(tag = "type", content = "data")]
pub enum NotificationEvent {
    #[serde(rename = "task.assigned")]
    TaskAssigned(TaskAssignedEvent),
    #[serde(rename = "task.due")]
    TaskDue(TaskDueEvent),
    #[serde(rename = "comment.added")]
    CommentAdded(CommentAddedEvent),
    #[serde(rename = "project.invite")]
    ProjectInvite(ProjectInviteEvent),
    #[serde(rename = "task.completed")]
    TaskCompleted(TaskCompletedEvent),
}

impl NotificationEvent {
    /// Bus name of this event
    pub fn event_name(&self) -> &'static str {
        match self {
            NotificationEvent::TaskAssigned(_) => TASK_ASSIGNED,
            NotificationEvent::TaskDue(_) => TASK_DUE,
            NotificationEvent::CommentAdded(_) => COMMENT_ADDED,
            NotificationEvent::ProjectInvite(_) => PROJECT_INVITE,
            NotificationEvent::TaskCompleted(_) => TASK_COMPLETED,
        }
    }

    pub fn notification_type(&self) -> NotificationType {
        match self {
            NotificationEvent::TaskAssigned(_) => NotificationType::TaskAssigned,
            NotificationEvent::TaskDue(_) => NotificationType::TaskDue,
            NotificationEvent::CommentAdded(_) => NotificationType::CommentAdded,
            NotificationEvent::ProjectInvite(_) => NotificationType::ProjectInvite,
            NotificationEvent::TaskCompleted(_) => NotificationType::TaskCompleted,
        }
    }

    /// User who receives the notification
    pub fn recipient_id(&self) -> Uuid {
        match self {
            NotificationEvent::TaskAssigned(e) => e.assignee_id,
            NotificationEvent::TaskDue(e) => e.user_id,
            NotificationEvent::CommentAdded(e) => e.task_creator_id,
            NotificationEvent::ProjectInvite(e) => e.user_id,
            NotificationEvent::TaskCompleted(e) => e.task_creator_id,
        }
    }

    /// Email address captured for the recipient
    pub fn recipient_email(&self) -> &str {
        match self {
            NotificationEvent::TaskAssigned(e) => &e.assignee_email,
            NotificationEvent::TaskDue(e) => &e.user_email,
            NotificationEvent::CommentAdded(e) => &e.task_creator_email,
            NotificationEvent::ProjectInvite(e) => &e.user_email,
            NotificationEvent::TaskCompleted(e) => &e.task_creator_email,
        }
    }

    /// User whose action raised the event. Due reminders have no actor.
    pub fn triggered_by(&self) -> Option<Uuid> {
        match self {
            NotificationEvent::TaskAssigned(e) => Some(e.assigned_by),
            NotificationEvent::TaskDue(_) => None,
            NotificationEvent::CommentAdded(e) => Some(e.comment_author),
            NotificationEvent::ProjectInvite(e) => Some(e.invited_by),
            NotificationEvent::TaskCompleted(e) => Some(e.completed_by),
        }
    }

    /// Build the notification record this event produces
    pub fn to_notification(&self) -> CreateNotification {
        let draft = CreateNotification::new(self.recipient_id(), self.notification_type());
        let draft = match self {
            NotificationEvent::TaskAssigned(e) => draft.with_task(e.task_id),
            NotificationEvent::TaskDue(e) => draft.with_task(e.task_id),
            NotificationEvent::CommentAdded(e) => draft.with_task(e.task_id),
            NotificationEvent::ProjectInvite(e) => draft.with_project(e.project_id),
            NotificationEvent::TaskCompleted(e) => draft.with_task(e.task_id),
        };
        match self.triggered_by() {
            Some(actor) => draft.with_triggered_by(actor),
            None => draft,
        }
    }
}

impl From<TaskAssignedEvent> for NotificationEvent {
    fn from(event: TaskAssignedEvent) -> Self {
        NotificationEvent::TaskAssigned(event)
    }
}

impl From<TaskDueEvent> for NotificationEvent {
    fn from(event: TaskDueEvent) -> Self {
        NotificationEvent::TaskDue(event)
    }
}

impl From<CommentAddedEvent> for NotificationEvent {
    fn from(event: CommentAddedEvent) -> Self {
        NotificationEvent::CommentAdded(event)
    }
}

impl From<ProjectInviteEvent> for NotificationEvent {
    fn from(event: ProjectInviteEvent) -> Self {
        NotificationEvent::ProjectInvite(event)
    }
}

impl From<TaskCompletedEvent> for NotificationEvent {
    fn from(event: TaskCompletedEvent) -> Self {
        NotificationEvent::TaskCompleted(event)
    }
}

// ============================================================================
// Tests
// ============================================================================
