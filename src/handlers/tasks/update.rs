// PUT /api/tasks/:taskId - full task edit by any member of the owning tenant

use axum::extract::Path;
use axum::{Extension, Json};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::audit;
use crate::database::manager::DatabaseManager;
use crate::database::models::{TaskPriority, TaskStatus};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy;

/// Distinguishes an absent field from an explicit null, so `assignedTo: null`
/// unassigns and `dueDate: null` clears the date.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, FromRow)]
struct UpdatedTaskRow {
    id: Uuid,
    title: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    updated_at: DateTime<Utc>,
    assignee_id: Option<Uuid>,
    assignee_name: Option<String>,
    assignee_email: Option<String>,
}

pub async fn update_task(
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let task: Option<(Uuid, Uuid)> =
        sqlx::query_as("SELECT id, tenant_id FROM tasks WHERE id = $1")
            .bind(task_id)
            .fetch_optional(&pool)
            .await?;
    let (_, task_tenant) = task.ok_or_else(|| ApiError::not_found("Task not found"))?;

    policy::touch_task(&auth.principal(), task_tenant)?;

    if let Some(Some(assignee_id)) = payload.assigned_to {
        let assignee_tenant: Option<Uuid> =
            sqlx::query_scalar("SELECT tenant_id FROM users WHERE id = $1")
                .bind(assignee_id)
                .fetch_optional(&pool)
                .await?;
        policy::validate_assignee(assignee_tenant, task_tenant)?;
    }

    let mut sets = Vec::new();
    let mut idx = 1;
    if payload.title.is_some() {
        sets.push(format!("title = ${}", idx));
        idx += 1;
    }
    if payload.description.is_some() {
        sets.push(format!("description = ${}", idx));
        idx += 1;
    }
    if payload.status.is_some() {
        sets.push(format!("status = ${}", idx));
        idx += 1;
    }
    if payload.priority.is_some() {
        sets.push(format!("priority = ${}", idx));
        idx += 1;
    }
    if payload.due_date.is_some() {
        sets.push(format!("due_date = ${}", idx));
        idx += 1;
    }
    if payload.assigned_to.is_some() {
        sets.push(format!("assigned_to = ${}", idx));
        idx += 1;
    }

    if sets.is_empty() {
        return Err(ApiError::bad_request("No fields provided for update"));
    }

    let sql = format!(
        "UPDATE tasks SET {}, updated_at = NOW() WHERE id = ${}",
        sets.join(", "),
        idx
    );

    let mut query = sqlx::query(&sql);
    if let Some(title) = &payload.title {
        query = query.bind(title);
    }
    if let Some(description) = &payload.description {
        query = query.bind(description);
    }
    if let Some(status) = payload.status {
        query = query.bind(status);
    }
    if let Some(priority) = payload.priority {
        query = query.bind(priority);
    }
    if let Some(due_date) = payload.due_date {
        query = query.bind(due_date);
    }
    if let Some(assigned_to) = payload.assigned_to {
        query = query.bind(assigned_to);
    }
    query = query.bind(task_id);

    query.execute(&pool).await?;

    audit::record(
        &pool,
        task_tenant,
        auth.user_id,
        audit::actions::UPDATE_TASK,
        audit::entities::TASK,
        &task_id.to_string(),
        None,
    )
    .await;

    // Re-read with the assignee joined in for the response.
    let updated: UpdatedTaskRow = sqlx::query_as(
        r#"
        SELECT
            t.id, t.title, t.description, t.status, t.priority, t.due_date, t.updated_at,
            u.id AS assignee_id,
            u.full_name AS assignee_name,
            u.email AS assignee_email
        FROM tasks t
        LEFT JOIN users u ON t.assigned_to = u.id
        WHERE t.id = $1
        "#,
    )
    .bind(task_id)
    .fetch_one(&pool)
    .await?;

    let assigned_to = updated.assignee_id.map(|id| {
        json!({
            "id": id,
            "fullName": updated.assignee_name,
            "email": updated.assignee_email,
        })
    });

    Ok(ApiResponse::success(json!({
        "id": updated.id,
        "title": updated.title,
        "description": updated.description,
        "status": updated.status,
        "priority": updated.priority,
        "assignedTo": assigned_to,
        "dueDate": updated.due_date,
        "updatedAt": updated.updated_at,
    })))
}
