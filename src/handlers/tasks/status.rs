// PATCH /api/tasks/:taskId/status - any member of the owning tenant.
//
// This path is deliberately permission-light compared to task edit/delete:
// no ownership or role check, just tenant membership. The dashboard uses it
// for the todo -> in_progress -> completed cycle.

use axum::extract::Path;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::TaskStatus;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy;

#[derive(Debug, FromRow)]
struct UpdatedStatus {
    id: Uuid,
    status: TaskStatus,
    updated_at: DateTime<Utc>,
}

pub async fn update_task_status(
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    // Parsed by hand so a missing field and a bad enum value both come back
    // as 400s with distinct messages.
    let status_value = payload
        .get("status")
        .filter(|v| !v.is_null())
        .ok_or_else(|| ApiError::bad_request("Status is required"))?;
    let status: TaskStatus = serde_json::from_value(status_value.clone())
        .map_err(|_| ApiError::bad_request("Invalid status value for this task"))?;

    let pool = DatabaseManager::pool().await?;

    let task: Option<(Uuid, Uuid)> =
        sqlx::query_as("SELECT id, tenant_id FROM tasks WHERE id = $1")
            .bind(task_id)
            .fetch_optional(&pool)
            .await?;
    let (_, task_tenant) = task.ok_or_else(|| ApiError::not_found("Task not found"))?;

    policy::touch_task(&auth.principal(), task_tenant)?;

    let updated: UpdatedStatus = sqlx::query_as(
        "UPDATE tasks SET status = $1, updated_at = NOW() WHERE id = $2 \
         RETURNING id, status, updated_at",
    )
    .bind(status)
    .bind(task_id)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::success(json!({
        "id": updated.id,
        "status": updated.status,
        "updatedAt": updated.updated_at,
    })))
}
