// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::policy::{Denial, QuotaResource};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 403 Forbidden, with usage payload so clients can render upgrade prompts
    LimitReached {
        message: String,
        current_usage: i64,
        limit: i32,
    },

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::LimitReached { .. } => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::LimitReached { message, .. } => message,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body: `{"error": "..."}`, plus the usage
    /// payload for quota refusals
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::LimitReached { message, current_usage, limit } => json!({
                "error": message,
                "currentUsage": current_usage,
                "limit": limit,
            }),
            _ => json!({ "error": self.message() }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert policy refusals into wire errors
impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Forbidden(msg) => ApiError::Forbidden(msg),
            Denial::NotFoundMasked(msg) => ApiError::NotFound(msg),
            Denial::SelfDeleteForbidden => {
                ApiError::forbidden("Operation failed. You cannot delete yourself.")
            }
            Denial::LimitReached { resource, plan, limit, current } => {
                let message = match resource {
                    QuotaResource::Members => format!(
                        "Subscription Limit Reached: Your {} plan only allows {} members.",
                        plan.as_str(),
                        limit
                    ),
                    QuotaResource::Projects => format!(
                        "Limit Reached: Your {} plan only allows {} projects.",
                        plan.as_str(),
                        limit
                    ),
                };
                ApiError::LimitReached { message, current_usage: current, limit }
            }
            Denial::InvalidAssignee => {
                ApiError::bad_request("Assigned user not found in this organization")
            }
        }
    }
}

// Constraint violations from Postgres become client errors instead of
// leaking as generic 500s
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::not_found("Record not found"),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => ApiError::conflict("Resource already exists"),
                // foreign_key_violation
                Some("23503") => ApiError::bad_request("Referenced record does not exist"),
                // invalid_text_representation (bad enum value, malformed uuid)
                Some("22P02") => ApiError::bad_request("Invalid field value"),
                _ => {
                    tracing::error!("Database error: {}", db_err);
                    ApiError::internal_server_error("Server error")
                }
            },
            sqlx::Error::PoolTimedOut => {
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            _ => {
                tracing::error!("SQLx error: {}", err);
                ApiError::internal_server_error("Server error")
            }
        }
    }
}

impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        use crate::database::manager::DatabaseError;
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::ConfigMissing(name) => {
                tracing::error!("Missing configuration: {}", name);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::QueryError(msg) => {
                tracing::error!("Database query error: {}", msg);
                ApiError::internal_server_error("Server error")
            }
            DatabaseError::Sqlx(sqlx_err) => sqlx_err.into(),
        }
    }
}

impl From<crate::auth::JwtError> for ApiError {
    fn from(err: crate::auth::JwtError) -> Self {
        tracing::error!("JWT error: {}", err);
        ApiError::internal_server_error("Server error")
    }
}

impl From<crate::auth::password::PasswordError> for ApiError {
    fn from(err: crate::auth::password::PasswordError) -> Self {
        tracing::error!("Password hashing error: {}", err);
        ApiError::internal_server_error("Server error")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::SubscriptionPlan;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(ApiError::bad_request("x").status_code(), 400);
        assert_eq!(ApiError::unauthorized("x").status_code(), 401);
        assert_eq!(ApiError::forbidden("x").status_code(), 403);
        assert_eq!(ApiError::not_found("x").status_code(), 404);
        assert_eq!(ApiError::conflict("x").status_code(), 409);
        assert_eq!(ApiError::internal_server_error("x").status_code(), 500);
    }

    #[test]
    fn limit_reached_is_403_with_usage_payload() {
        let err: ApiError = Denial::LimitReached {
            resource: QuotaResource::Members,
            plan: SubscriptionPlan::Free,
            limit: 5,
            current: 5,
        }
        .into();

        assert_eq!(err.status_code(), 403);
        let body = err.to_json();
        assert_eq!(body["currentUsage"], 5);
        assert_eq!(body["limit"], 5);
        assert!(body["error"].as_str().unwrap().contains("Free"));
    }

    #[test]
    fn masked_denials_become_404() {
        let err: ApiError = Denial::NotFoundMasked("Project not found in your organization".into()).into();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn invalid_assignee_is_a_bad_request() {
        let err: ApiError = Denial::InvalidAssignee.into();
        assert_eq!(err.status_code(), 400);
    }
}
