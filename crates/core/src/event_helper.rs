// Notification event helper
//
// Thin facade for domain services: one call per event kind, each building
// the payload and publishing it on the bus. Publishing is fire-and-forget.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::bus::EventBus;
use crate::events::{
    CommentAddedEvent, NotificationEvent, ProjectInviteEvent, TaskAssignedEvent,
    TaskCompletedEvent, TaskDueEvent,
};

/// Emits notification events on an injected bus
#[derive(Debug, Clone)]
pub struct NotificationEventHelper {
    bus: EventBus,
}

impl NotificationEventHelper {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn emit_task_assigned(
        &self,
        assignee_id: Uuid,
        task_id: Uuid,
        task_title: &str,
        assigned_by: Uuid,
        assigner_name: &str,
        assignee_email: &str,
    ) {
        self.emit(TaskAssignedEvent {
            assignee_id,
            task_id,
            task_title: task_title.to_string(),
            assigned_by,
            assigner_name: assigner_name.to_string(),
            assignee_email: assignee_email.to_string(),
        });
    }

    pub fn emit_task_due(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        task_title: &str,
        due_date: DateTime<Utc>,
        user_email: &str,
    ) {
        self.emit(TaskDueEvent {
            user_id,
            task_id,
            task_title: task_title.to_string(),
            due_date,
            user_email: user_email.to_string(),
        });
    }

    pub fn emit_comment_added(
        &self,
        task_creator_id: Uuid,
        task_id: Uuid,
        task_title: &str,
        comment_author: Uuid,
        comment_author_name: &str,
        task_creator_email: &str,
    ) {
        self.emit(CommentAddedEvent {
            task_creator_id,
            task_id,
            task_title: task_title.to_string(),
            comment_author,
            comment_author_name: comment_author_name.to_string(),
            task_creator_email: task_creator_email.to_string(),
        });
    }

    pub fn emit_project_invite(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        project_name: &str,
        invited_by: Uuid,
        inviter_name: &str,
        user_email: &str,
    ) {
        self.emit(ProjectInviteEvent {
            user_id,
            project_id,
            project_name: project_name.to_string(),
            invited_by,
            inviter_name: inviter_name.to_string(),
            user_email: user_email.to_string(),
        });
    }

    pub fn emit_task_completed(
        &self,
        task_creator_id: Uuid,
        task_id: Uuid,
        task_title: &str,
        completed_by: Uuid,
        completer_name: &str,
        task_creator_email: &str,
    ) {
        self.emit(TaskCompletedEvent {
            task_creator_id,
            task_id,
            task_title: task_title.to_string(),
            completed_by,
            completer_name: completer_name.to_string(),
            task_creator_email: task_creator_email.to_string(),
        });
    }

    /// Publish an already-built event
    pub fn emit(&self, event: impl Into<NotificationEvent>) {
        let event = event.into();
        tracing::debug!(
            event_name = event.event_name(),
            recipient_id = %event.recipient_id(),
            "Emitting notification event"
        );
        self.bus.publish(event);
    }
}
