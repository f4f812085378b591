// POST /api/projects/:projectId/tasks

use axum::extract::Path;
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::audit;
use crate::database::manager::DatabaseManager;
use crate::database::models::{Task, TaskPriority, TaskStatus};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
}

pub async fn create_task(
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    if payload.title.is_empty() {
        return Err(ApiError::bad_request("Task title is required"));
    }

    let pool = DatabaseManager::pool().await?;

    let project: Option<(Uuid, Uuid)> =
        sqlx::query_as("SELECT id, tenant_id FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(&pool)
            .await?;
    let (_, project_tenant) = project
        .ok_or_else(|| ApiError::not_found("Project not found in your organization"))?;

    policy::access_project(&auth.principal(), project_tenant)?;

    if let Some(assignee_id) = payload.assigned_to {
        let assignee_tenant: Option<Uuid> =
            sqlx::query_scalar("SELECT tenant_id FROM users WHERE id = $1")
                .bind(assignee_id)
                .fetch_optional(&pool)
                .await?;
        policy::validate_assignee(assignee_tenant, project_tenant)?;
    }

    // The task inherits the project's tenant, keeping the denormalized
    // column consistent even for cross-tenant super_admin calls.
    let task: Task = sqlx::query_as(
        r#"
        INSERT INTO tasks (project_id, tenant_id, title, description, assigned_to, priority, status, due_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(project_id)
    .bind(project_tenant)
    .bind(&payload.title)
    .bind(payload.description.as_deref().unwrap_or(""))
    .bind(payload.assigned_to)
    .bind(payload.priority.unwrap_or(TaskPriority::Medium))
    .bind(payload.status.unwrap_or(TaskStatus::Todo))
    .bind(payload.due_date)
    .fetch_one(&pool)
    .await?;

    audit::record(
        &pool,
        project_tenant,
        auth.user_id,
        audit::actions::CREATE_TASK,
        audit::entities::TASK,
        &task.id.to_string(),
        None,
    )
    .await;

    Ok(ApiResponse::created(json!({
        "id": task.id,
        "projectId": task.project_id,
        "title": task.title,
        "description": task.description,
        "status": task.status,
        "priority": task.priority,
        "assignedTo": task.assigned_to,
        "dueDate": task.due_date,
        "createdAt": task.created_at,
        "updatedAt": task.updated_at,
    })))
}
