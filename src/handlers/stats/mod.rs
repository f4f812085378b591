// GET /api/stats/* - dashboard counters. super_admin sees global numbers,
// everyone else their own organization's.

use axum::Extension;
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;

#[derive(Debug, FromRow)]
struct DashboardRow {
    total_projects: i64,
    total_tasks: i64,
    completed_tasks: i64,
    pending_tasks: i64,
}

pub async fn dashboard_stats(
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let row: DashboardRow = match auth.principal().tenant_scope() {
        None => {
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM projects) AS total_projects,
                    COUNT(t.id) AS total_tasks,
                    COUNT(t.id) FILTER (WHERE t.status = 'completed') AS completed_tasks,
                    COUNT(t.id) FILTER (WHERE t.status != 'completed') AS pending_tasks
                FROM tasks t
                "#,
            )
            .fetch_one(&pool)
            .await?
        }
        Some(tenant_id) => {
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM projects WHERE tenant_id = $1) AS total_projects,
                    COUNT(t.id) AS total_tasks,
                    COUNT(t.id) FILTER (WHERE t.status = 'completed') AS completed_tasks,
                    COUNT(t.id) FILTER (WHERE t.status != 'completed') AS pending_tasks
                FROM tasks t
                WHERE t.tenant_id = $1
                "#,
            )
            .bind(tenant_id)
            .fetch_one(&pool)
            .await?
        }
    };

    Ok(ApiResponse::success(json!({
        "totalProjects": row.total_projects,
        "totalTasks": row.total_tasks,
        "completedTasks": row.completed_tasks,
        "pendingTasks": row.pending_tasks,
    })))
}

/// Task counts keyed by project id, for the recent-projects table.
pub async fn project_task_counts(
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let rows: Vec<(Uuid, i64)> = match auth.principal().tenant_scope() {
        None => {
            sqlx::query_as("SELECT project_id, COUNT(*) FROM tasks GROUP BY project_id")
                .fetch_all(&pool)
                .await?
        }
        Some(tenant_id) => {
            sqlx::query_as(
                "SELECT project_id, COUNT(*) FROM tasks WHERE tenant_id = $1 GROUP BY project_id",
            )
            .bind(tenant_id)
            .fetch_all(&pool)
            .await?
        }
    };

    let counts: Vec<serde_json::Value> = rows
        .into_iter()
        .map(|(id, count)| json!({ "id": id, "taskCount": count }))
        .collect();

    Ok(ApiResponse::success(json!(counts)))
}
