// Common DTOs for public API
//
// These types are shared across multiple API endpoints.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub error: String,
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Convert to axum response tuple
    pub fn into_response(self, status: StatusCode) -> ApiError {
        (status, Json(self))
    }
}

/// Map a pipeline error to an HTTP error.
/// Internal details are logged, not returned.
pub fn api_error(error: taskdeck_core::Error) -> ApiError {
    match error {
        taskdeck_core::Error::NotFound(_) => {
            ErrorResponse::new(error.to_string()).into_response(StatusCode::NOT_FOUND)
        }
        taskdeck_core::Error::Auth(msg) => {
            ErrorResponse::new(msg).into_response(StatusCode::UNAUTHORIZED)
        }
        other => {
            tracing::error!(error = %other, "Request failed");
            ErrorResponse::new("Internal server error")
                .into_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub fn forbidden() -> ApiError {
    ErrorResponse::new("Access to another user's notifications is not allowed")
        .into_response(StatusCode::FORBIDDEN)
}

/// Response wrapper for list endpoints.
/// All list endpoints return responses wrapped in a `data` field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    /// Array of items returned by the list operation.
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_not_found_maps_to_404() {
        let (status, Json(body)) =
            api_error(taskdeck_core::Error::notification_not_found(Uuid::nil()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.error.ends_with("not found"));
    }

    #[test]
    fn test_store_error_is_hidden() {
        let (status, Json(body)) = api_error(taskdeck_core::Error::store("password=hunter2"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal server error");
    }

    #[test]
    fn test_list_response_shape() {
        let json = serde_json::to_value(ListResponse::new(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"data": [1, 2]}));
    }
}
