use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Wrapper for API responses that automatically adds the success envelope:
/// `{ "success": true, "data": ... }`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self { data, status_code: None }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self { data, status_code: Some(status_code) }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to serialize response data" })),
                )
                    .into_response();
            }
        };

        let envelope = json!({
            "success": true,
            "data": data_value
        });

        (status, Json(envelope)).into_response()
    }
}

/// Message-only success envelope: `{ "success": true, "message": "..." }`
#[derive(Debug)]
pub struct ApiMessage {
    pub message: String,
    pub status_code: StatusCode,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { message: message.into(), status_code: StatusCode::OK }
    }

    pub fn created(message: impl Into<String>) -> Self {
        Self { message: message.into(), status_code: StatusCode::CREATED }
    }
}

impl IntoResponse for ApiMessage {
    fn into_response(self) -> Response {
        let envelope = json!({
            "success": true,
            "message": self.message
        });
        (self.status_code, Json(envelope)).into_response()
    }
}

/// Convenience result alias for handlers
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
