// Activity notifier
//
// Entry point for domain services (tasks, comments, projects). Resolves the
// recipient and actor from the user directory, applies the self-notify
// guards, then emits through the event helper. Never fails the caller.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use taskdeck_core::{NotificationEventHelper, UserDirectory, UserProfile};
use uuid::Uuid;

/// Task status that counts as completed
pub const DONE_STATUS: &str = "done";

/// The task fields notifications need
#[derive(Debug, Clone)]
pub struct TaskSummary {
    pub id: Uuid,
    pub title: String,
    pub creator_id: Uuid,
    pub due_date: Option<DateTime<Utc>>,
}

/// The project fields notifications need
#[derive(Debug, Clone)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
}

pub struct ActivityNotifier {
    helper: NotificationEventHelper,
    users: Arc<dyn UserDirectory>,
}

impl ActivityNotifier {
    pub fn new(helper: NotificationEventHelper, users: Arc<dyn UserDirectory>) -> Self {
        Self { helper, users }
    }

    /// A user was added to a task's assignees
    pub async fn task_assigned(&self, task: &TaskSummary, assignee_id: Uuid, assigned_by: Uuid) {
        if assignee_id == assigned_by {
            return;
        }
        let Some((assignee, assigner)) = self.resolve_pair(assignee_id, assigned_by).await else {
            return;
        };
        self.helper.emit_task_assigned(
            assignee.id,
            task.id,
            &task.title,
            assigner.id,
            &assigner.name,
            &assignee.email,
        );
    }

    /// A task's status changed; only a move to done notifies the creator
    pub async fn task_status_changed(
        &self,
        task: &TaskSummary,
        old_status: &str,
        new_status: &str,
        changed_by: Uuid,
    ) {
        if old_status == new_status || new_status != DONE_STATUS || task.creator_id == changed_by {
            return;
        }
        let Some((creator, completer)) = self.resolve_pair(task.creator_id, changed_by).await else {
            return;
        };
        self.helper.emit_task_completed(
            creator.id,
            task.id,
            &task.title,
            completer.id,
            &completer.name,
            &creator.email,
        );
    }

    /// A comment was posted on a task
    pub async fn comment_added(&self, task: &TaskSummary, author_id: Uuid) {
        if author_id == task.creator_id {
            return;
        }
        let Some((creator, author)) = self.resolve_pair(task.creator_id, author_id).await else {
            return;
        };
        self.helper.emit_comment_added(
            creator.id,
            task.id,
            &task.title,
            author.id,
            &author.name,
            &creator.email,
        );
    }

    /// A member was added to a project
    pub async fn project_member_added(
        &self,
        project: &ProjectSummary,
        member_id: Uuid,
        invited_by: Uuid,
    ) {
        if member_id == invited_by {
            return;
        }
        let Some((member, inviter)) = self.resolve_pair(member_id, invited_by).await else {
            return;
        };
        self.helper.emit_project_invite(
            member.id,
            project.id,
            &project.name,
            inviter.id,
            &inviter.name,
            &member.email,
        );
    }

    /// Remind a user that a task is coming due
    pub async fn task_due(&self, task: &TaskSummary, user_id: Uuid) {
        let Some(due_date) = task.due_date else {
            tracing::debug!(task_id = %task.id, "Task has no due date, skipping reminder");
            return;
        };
        let Some(user) = self.resolve(user_id).await else {
            return;
        };
        self.helper
            .emit_task_due(user.id, task.id, &task.title, due_date, &user.email);
    }

    async fn resolve_pair(
        &self,
        recipient_id: Uuid,
        actor_id: Uuid,
    ) -> Option<(UserProfile, UserProfile)> {
        let recipient = self.resolve(recipient_id).await?;
        let actor = self.resolve(actor_id).await?;
        Some((recipient, actor))
    }

    async fn resolve(&self, user_id: Uuid) -> Option<UserProfile> {
        match self.users.get_user(user_id).await {
            Ok(Some(user)) => Some(user),
            Ok(None) => {
                tracing::warn!(user_id = %user_id, "User not found, skipping notification");
                None
            }
            Err(e) => {
                tracing::error!(
                    user_id = %user_id,
                    error = %e,
                    "Failed to resolve user, skipping notification"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use taskdeck_core::{events, EventBus, EventHandler, NotificationEvent, Result};

    #[derive(Default)]
    struct Directory {
        users: HashMap<Uuid, UserProfile>,
    }

    impl Directory {
        fn with(names: &[&str]) -> (Self, Vec<Uuid>) {
            let mut users = HashMap::new();
            let mut ids = Vec::new();
            for name in names {
                let id = Uuid::now_v7();
                users.insert(
                    id,
                    UserProfile {
                        id,
                        name: name.to_string(),
                        email: format!("{}@example.com", name.to_lowercase()),
                    },
                );
                ids.push(id);
            }
            (Self { users }, ids)
        }
    }

    #[async_trait]
    impl UserDirectory for Directory {
        async fn get_user(&self, id: Uuid) -> Result<Option<UserProfile>> {
            Ok(self.users.get(&id).cloned())
        }
    }

    #[derive(Default)]
    struct Capture {
        events: Mutex<Vec<NotificationEvent>>,
    }

    #[async_trait]
    impl EventHandler for Capture {
        async fn handle(&self, event: &NotificationEvent) -> Result<()> {
            self.events.lock().push(event.clone());
            Ok(())
        }
    }

    struct Harness {
        notifier: ActivityNotifier,
        capture: Arc<Capture>,
        ids: Vec<Uuid>,
    }

    impl Harness {
        fn new() -> Self {
            let bus = EventBus::new();
            let capture = Arc::new(Capture::default());
            for name in events::ALL_EVENT_NAMES {
                bus.subscribe(name, capture.clone());
            }
            let (directory, ids) = Directory::with(&["Jo", "Bea"]);
            let notifier =
                ActivityNotifier::new(NotificationEventHelper::new(bus), Arc::new(directory));
            Self {
                notifier,
                capture,
                ids,
            }
        }

        fn task(&self, creator: Uuid) -> TaskSummary {
            TaskSummary {
                id: Uuid::now_v7(),
                title: "Fix login".to_string(),
                creator_id: creator,
                due_date: None,
            }
        }

        async fn settle(&self) -> Vec<NotificationEvent> {
            for _ in 0..20 {
                tokio::task::yield_now().await;
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
            self.capture.events.lock().clone()
        }
    }

    #[tokio::test]
    async fn test_task_assigned_resolves_real_names() {
        let h = Harness::new();
        let (jo, bea) = (h.ids[0], h.ids[1]);

        h.notifier.task_assigned(&h.task(bea), jo, bea).await;

        let events = h.settle().await;
        assert_eq!(events.len(), 1);
        match &events[0] {
            NotificationEvent::TaskAssigned(e) => {
                assert_eq!(e.assignee_id, jo);
                assert_eq!(e.assigner_name, "Bea");
                assert_eq!(e.assignee_email, "jo@example.com");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_self_actions_emit_nothing() {
        let h = Harness::new();
        let jo = h.ids[0];
        let task = h.task(jo);

        h.notifier.task_assigned(&task, jo, jo).await;
        h.notifier.comment_added(&task, jo).await;
        h.notifier.task_status_changed(&task, "in_progress", DONE_STATUS, jo).await;
        h.notifier
            .project_member_added(
                &ProjectSummary {
                    id: Uuid::now_v7(),
                    name: "Apollo".to_string(),
                },
                jo,
                jo,
            )
            .await;

        assert!(h.settle().await.is_empty());
    }

    #[tokio::test]
    async fn test_only_transition_to_done_notifies_creator() {
        let h = Harness::new();
        let (jo, bea) = (h.ids[0], h.ids[1]);
        let task = h.task(jo);

        h.notifier.task_status_changed(&task, "todo", "in_progress", bea).await;
        h.notifier.task_status_changed(&task, DONE_STATUS, DONE_STATUS, bea).await;
        h.notifier.task_status_changed(&task, "in_progress", DONE_STATUS, bea).await;

        let events = h.settle().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_name(), events::TASK_COMPLETED);
        assert_eq!(events[0].recipient_id(), jo);
        assert_eq!(events[0].recipient_email(), "jo@example.com");
    }

    #[tokio::test]
    async fn test_unknown_user_skips_event() {
        let h = Harness::new();
        let jo = h.ids[0];

        h.notifier.comment_added(&h.task(jo), Uuid::now_v7()).await;

        assert!(h.settle().await.is_empty());
    }

    #[tokio::test]
    async fn test_task_due_requires_due_date() {
        let h = Harness::new();
        let jo = h.ids[0];
        let mut task = h.task(h.ids[1]);

        h.notifier.task_due(&task, jo).await;
        task.due_date = Some(Utc::now());
        h.notifier.task_due(&task, jo).await;

        let events = h.settle().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_name(), events::TASK_DUE);
    }

    #[tokio::test]
    async fn test_project_invite_goes_to_member() {
        let h = Harness::new();
        let (jo, bea) = (h.ids[0], h.ids[1]);
        let project = ProjectSummary {
            id: Uuid::now_v7(),
            name: "Apollo".to_string(),
        };

        h.notifier.project_member_added(&project, jo, bea).await;

        let events = h.settle().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].recipient_id(), jo);
        assert_eq!(events[0].to_notification().related_project_id, Some(project.id));
    }
}
