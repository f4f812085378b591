// GET /api/projects/:projectId/tasks

use axum::extract::{Path, Query};
use axum::Extension;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{TaskPriority, TaskStatus};
use crate::error::ApiError;
use crate::filter::{ListQuery, Pagination};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    assignee_id: Option<Uuid>,
    assignee_name: Option<String>,
    assignee_email: Option<String>,
}

pub async fn list_project_tasks(
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
    Query(params): Query<ListTasksParams>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let principal = auth.principal();
    let pool = DatabaseManager::pool().await?;

    let project: Option<(Uuid, Uuid)> =
        sqlx::query_as("SELECT id, tenant_id FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(&pool)
            .await?;
    let (_, project_tenant) = project
        .ok_or_else(|| ApiError::not_found("Project not found in your organization"))?;

    policy::access_project(&principal, project_tenant)?;

    let page = Pagination::clamped(params.page, params.limit, 50);

    let mut query = ListQuery::new();
    query.eq_uuid("t.project_id", project_id);
    query.tenant_scope("t.tenant_id", principal.tenant_scope());
    if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
        query.search(&["t.title"], search);
    }
    if let Some(status) = params.status {
        query.eq_enum("t.status", "task_status", status.db_value());
    }
    if let Some(priority) = params.priority {
        query.eq_enum("t.priority", "task_priority", priority.db_value());
    }
    if let Some(assignee) = params.assigned_to {
        query.eq_uuid("t.assigned_to", assignee);
    }

    let total = query.fetch_count(&pool, "tasks t").await?;

    let rows: Vec<TaskRow> = query
        .fetch_page(
            &pool,
            r#"
            SELECT
                t.id, t.title, t.description, t.status, t.priority, t.due_date, t.created_at,
                u.id AS assignee_id,
                u.full_name AS assignee_name,
                u.email AS assignee_email
            FROM tasks t
            LEFT JOIN users u ON t.assigned_to = u.id
            "#,
            "t.priority DESC, t.due_date ASC",
            &page,
        )
        .await?;

    let tasks: Vec<serde_json::Value> = rows
        .into_iter()
        .map(|row| {
            let assigned_to = row.assignee_id.map(|id| {
                json!({
                    "id": id,
                    "fullName": row.assignee_name,
                    "email": row.assignee_email,
                })
            });
            json!({
                "id": row.id,
                "title": row.title,
                "description": row.description,
                "status": row.status,
                "priority": row.priority,
                "assignedTo": assigned_to,
                "dueDate": row.due_date,
                "createdAt": row.created_at,
            })
        })
        .collect();

    Ok(ApiResponse::success(json!({
        "tasks": tasks,
        "total": total,
        "pagination": {
            "currentPage": page.page,
            "totalPages": page.total_pages(total),
            "totalTasks": total,
            "limit": page.limit,
        }
    })))
}
