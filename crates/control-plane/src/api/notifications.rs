// Notification HTTP routes
// Decision: Callers only see their own notifications unless they hold the admin role
// Decision: Another user's notification id answers 404, not 403, so ids of other users stay hidden

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taskdeck_core::{Error, Notification};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{api_error, forbidden, ApiError, ErrorResponse, ListResponse};
use crate::auth::{AuthState, AuthUser, FromRef};
use crate::services::NotificationService;

/// Query for the notification list
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListNotificationsQuery {
    /// Maximum number of notifications to return (defaults to the server limit)
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountResponse {
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkAllReadResponse {
    /// Number of notifications flipped to read
    pub updated: u64,
}

/// App state for notification routes
#[derive(Clone)]
pub struct NotificationsState {
    pub service: Arc<NotificationService>,
    pub auth: AuthState,
}

impl FromRef<NotificationsState> for AuthState {
    fn from_ref(state: &NotificationsState) -> Self {
        state.auth.clone()
    }
}

/// Create notification routes
pub fn routes(state: NotificationsState) -> Router {
    Router::new()
        .route("/v1/users/:user_id/notifications", get(list_notifications))
        .route("/v1/users/:user_id/notifications/unread", get(list_unread))
        .route("/v1/users/:user_id/notifications/unread-count", get(unread_count))
        .route("/v1/users/:user_id/notifications/read-all", patch(mark_all_read))
        .route("/v1/notifications/:id/read", patch(mark_read))
        .route("/v1/notifications/:id", delete(delete_notification))
        .with_state(state)
}

fn ensure_user_access(user: &AuthUser, user_id: Uuid) -> Result<(), ApiError> {
    if user.can_access_user(user_id) {
        Ok(())
    } else {
        tracing::debug!(
            caller = %user.id,
            user_id = %user_id,
            "Rejected cross-user notification access"
        );
        Err(forbidden())
    }
}

/// Load a notification the caller owns
async fn owned_notification(
    service: &NotificationService,
    user: &AuthUser,
    id: Uuid,
) -> Result<Notification, ApiError> {
    let notification = service.get(id).await.map_err(api_error)?;
    if !user.can_access_user(notification.user_id) {
        return Err(api_error(Error::notification_not_found(id)));
    }
    Ok(notification)
}

/// GET /v1/users/{user_id}/notifications - List a user's notifications, newest first
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/notifications",
    params(
        ("user_id" = Uuid, Path, description = "Recipient user ID"),
        ListNotificationsQuery
    ),
    responses(
        (status = 200, description = "Notifications", body = ListResponse<Notification>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    user: AuthUser,
    State(state): State<NotificationsState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<ListResponse<Notification>>, ApiError> {
    ensure_user_access(&user, user_id)?;
    let notifications = state
        .service
        .find_by_user(user_id, query.limit)
        .await
        .map_err(api_error)?;
    Ok(Json(ListResponse::new(notifications)))
}

/// GET /v1/users/{user_id}/notifications/unread - List unread notifications
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/notifications/unread",
    params(("user_id" = Uuid, Path, description = "Recipient user ID")),
    responses(
        (status = 200, description = "Unread notifications", body = ListResponse<Notification>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn list_unread(
    user: AuthUser,
    State(state): State<NotificationsState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ListResponse<Notification>>, ApiError> {
    ensure_user_access(&user, user_id)?;
    let notifications = state
        .service
        .find_unread_by_user(user_id)
        .await
        .map_err(api_error)?;
    Ok(Json(ListResponse::new(notifications)))
}

/// GET /v1/users/{user_id}/notifications/unread-count
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/notifications/unread-count",
    params(("user_id" = Uuid, Path, description = "Recipient user ID")),
    responses(
        (status = 200, description = "Unread count", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn unread_count(
    user: AuthUser,
    State(state): State<NotificationsState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    ensure_user_access(&user, user_id)?;
    let count = state.service.unread_count(user_id).await.map_err(api_error)?;
    Ok(Json(UnreadCountResponse { count }))
}

/// PATCH /v1/users/{user_id}/notifications/read-all
#[utoipa::path(
    patch,
    path = "/v1/users/{user_id}/notifications/read-all",
    params(("user_id" = Uuid, Path, description = "Recipient user ID")),
    responses(
        (status = 200, description = "Notifications marked read", body = MarkAllReadResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn mark_all_read(
    user: AuthUser,
    State(state): State<NotificationsState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    ensure_user_access(&user, user_id)?;
    let updated = state
        .service
        .mark_all_as_read(user_id)
        .await
        .map_err(api_error)?;
    Ok(Json(MarkAllReadResponse { updated }))
}

/// PATCH /v1/notifications/{id}/read - Mark one notification read
#[utoipa::path(
    patch,
    path = "/v1/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = Notification),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn mark_read(
    user: AuthUser,
    State(state): State<NotificationsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    owned_notification(&state.service, &user, id).await?;
    let notification = state.service.mark_as_read(id).await.map_err(api_error)?;
    Ok(Json(notification))
}

/// DELETE /v1/notifications/{id} - Soft-delete a notification
#[utoipa::path(
    delete,
    path = "/v1/notifications/{id}",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn delete_notification(
    user: AuthUser,
    State(state): State<NotificationsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    owned_notification(&state.service, &user, id).await?;
    state.service.delete(id).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
