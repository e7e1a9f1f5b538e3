// OpenAPI specification generation
//
// Used by the API server (Swagger UI) and the export-openapi binary.

use crate::api;
use crate::api::ListResponse;
use taskdeck_core::{
    CommentAddedEvent, Notification, NotificationEvent, NotificationType, ProjectInviteEvent,
    TaskAssignedEvent, TaskCompletedEvent, TaskDueEvent,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the notification API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::notifications::list_notifications,
        api::notifications::list_unread,
        api::notifications::unread_count,
        api::notifications::mark_all_read,
        api::notifications::mark_read,
        api::notifications::delete_notification,
        api::events::publish_event,
    ),
    components(
        schemas(
            Notification, NotificationType,
            NotificationEvent, TaskAssignedEvent, TaskDueEvent, CommentAddedEvent,
            ProjectInviteEvent, TaskCompletedEvent,
            ListResponse<Notification>,
            api::notifications::UnreadCountResponse,
            api::notifications::MarkAllReadResponse,
            api::events::EventAcceptedResponse,
            api::ErrorResponse,
        )
    ),
    tags(
        (name = "notifications", description = "Notification inbox endpoints"),
        (name = "events", description = "Notification event ingestion")
    ),
    info(
        title = "Taskdeck Notifications API",
        version = "0.1.0",
        description = "Per-user notification inbox and event ingestion",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> Result<String, serde_json::Error> {
        Self::openapi().to_pretty_json()
    }
}
