// Notification event ingestion
// Decision: Admin-only; other services post events here instead of linking the bus
// Decision: 202 on publish; delivery happens after the response

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use taskdeck_core::{EventBus, NotificationEvent};
use utoipa::ToSchema;

use super::common::ErrorResponse;
use crate::auth::{AdminUser, AuthState, FromRef};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventAcceptedResponse {
    /// Name the event was published under, e.g. `task.assigned`
    pub event: String,
    /// Handlers subscribed at publish time
    pub subscribers: usize,
}

/// App state for event ingestion
#[derive(Clone)]
pub struct EventsState {
    pub bus: EventBus,
    pub auth: AuthState,
}

impl FromRef<EventsState> for AuthState {
    fn from_ref(state: &EventsState) -> Self {
        state.auth.clone()
    }
}

/// Create event ingestion routes
pub fn routes(state: EventsState) -> Router {
    Router::new()
        .route("/v1/notification-events", post(publish_event))
        .with_state(state)
}

/// POST /v1/notification-events - Publish a notification event
#[utoipa::path(
    post,
    path = "/v1/notification-events",
    request_body = NotificationEvent,
    responses(
        (status = 202, description = "Event accepted", body = EventAcceptedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 422, description = "Malformed event")
    ),
    tag = "events"
)]
pub async fn publish_event(
    AdminUser(user): AdminUser,
    State(state): State<EventsState>,
    Json(event): Json<NotificationEvent>,
) -> (StatusCode, Json<EventAcceptedResponse>) {
    let name = event.event_name();
    let subscribers = state.bus.subscriber_count(name);
    tracing::info!(
        event_name = name,
        recipient = %event.recipient_id(),
        published_by = %user.id,
        subscribers,
        "Notification event received"
    );
    state.bus.publish(event);

    (
        StatusCode::ACCEPTED,
        Json(EventAcceptedResponse {
            event: name.to_string(),
            subscribers,
        }),
    )
}
