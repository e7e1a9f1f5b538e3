// Notification listener
//
// Subscribed to every notification event. For each event it runs three
// isolated steps: persist, push to the recipient's room, send email.
// A failing step is logged and the next one still runs; the bus always
// sees success.

use async_trait::async_trait;
use std::sync::Arc;
use taskdeck_core::{
    events, EventBus, EventHandler, Notification, NotificationEvent, NotificationStore,
    RealtimePublisher, Result,
};
use uuid::Uuid;

use crate::email::EmailService;

/// What happened to one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Id of the notification that was pushed (transient if not persisted)
    pub notification_id: Uuid,
    pub persisted: bool,
    /// Sessions reached by the real-time push
    pub pushed: usize,
    pub emailed: bool,
}

pub struct NotificationListener {
    store: Arc<dyn NotificationStore>,
    realtime: Arc<dyn RealtimePublisher>,
    email: Arc<EmailService>,
}

impl NotificationListener {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        realtime: Arc<dyn RealtimePublisher>,
        email: Arc<EmailService>,
    ) -> Self {
        Self {
            store,
            realtime,
            email,
        }
    }

    /// Subscribe to all notification events
    pub fn register(self: &Arc<Self>, bus: &EventBus) {
        for name in events::ALL_EVENT_NAMES {
            bus.subscribe(name, self.clone());
        }
    }

    /// Process one event and report the outcome of each step
    pub async fn process(&self, event: &NotificationEvent) -> DeliveryReport {
        let (notification, persisted) = self.persist(event).await;
        let pushed = self.push(event, &notification).await;
        let emailed = self.send_email(event).await;

        tracing::debug!(
            event_name = event.event_name(),
            user_id = %notification.user_id,
            notification_id = %notification.id,
            persisted,
            pushed,
            emailed,
            "Notification event processed"
        );

        DeliveryReport {
            notification_id: notification.id,
            persisted,
            pushed,
            emailed,
        }
    }

    async fn persist(&self, event: &NotificationEvent) -> (Notification, bool) {
        let draft = event.to_notification();
        match self.store.create_notification(draft.clone()).await {
            Ok(notification) => (notification, true),
            Err(e) => {
                tracing::error!(
                    event_name = event.event_name(),
                    user_id = %draft.user_id,
                    error = %e,
                    "Failed to persist notification, pushing unsaved copy"
                );
                (Notification::transient(draft), false)
            }
        }
    }

    async fn push(&self, event: &NotificationEvent, notification: &Notification) -> usize {
        match self
            .realtime
            .send_notification_to_user(notification.user_id, notification)
            .await
        {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::error!(
                    event_name = event.event_name(),
                    user_id = %notification.user_id,
                    error = %e,
                    "Failed to push notification"
                );
                0
            }
        }
    }

    async fn send_email(&self, event: &NotificationEvent) -> bool {
        let to = event.recipient_email();
        let result = match event {
            NotificationEvent::TaskAssigned(e) => {
                self.email
                    .send_task_assigned_email(to, &e.task_title, &e.assigner_name)
                    .await
            }
            NotificationEvent::TaskDue(e) => {
                self.email
                    .send_task_due_email(to, &e.task_title, e.due_date)
                    .await
            }
            NotificationEvent::CommentAdded(e) => {
                self.email
                    .send_comment_notification_email(to, &e.task_title, &e.comment_author_name)
                    .await
            }
            NotificationEvent::ProjectInvite(e) => {
                self.email
                    .send_project_invite_email(to, &e.project_name, &e.inviter_name)
                    .await
            }
            NotificationEvent::TaskCompleted(e) => {
                self.email
                    .send_task_completed_email(to, &e.task_title, &e.completer_name)
                    .await
            }
        };
        // EmailService already logged the failure with the recipient
        result.is_ok()
    }
}

#[async_trait]
impl EventHandler for NotificationListener {
    async fn handle(&self, event: &NotificationEvent) -> Result<()> {
        self.process(event).await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "NotificationListener"
    }
}
