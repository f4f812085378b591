// POST /api/projects - any authenticated member, quota-guarded

use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::audit;
use crate::database::manager::DatabaseManager;
use crate::database::models::{Project, ProjectStatus, SubscriptionPlan};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy;

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

/// Same tenant-row-lock pattern as member provisioning: the count check and
/// the insert commit atomically, so the plan ceiling holds under concurrency.
pub async fn create_project(
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    if payload.name.is_empty() {
        return Err(ApiError::bad_request("Project name is required"));
    }

    let pool = DatabaseManager::pool().await?;
    let mut tx = pool.begin().await?;

    let tenant: Option<(SubscriptionPlan, i32)> =
        sqlx::query_as("SELECT subscription_plan, max_projects FROM tenants WHERE id = $1 FOR UPDATE")
            .bind(auth.tenant_id)
            .fetch_optional(&mut *tx)
            .await?;
    let (plan, max_projects) = tenant.ok_or_else(|| ApiError::not_found("Tenant not found"))?;

    let current: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE tenant_id = $1")
        .bind(auth.tenant_id)
        .fetch_one(&mut *tx)
        .await?;

    policy::project_quota(plan, max_projects, current)?;

    let project: Project = sqlx::query_as(
        r#"
        INSERT INTO projects (tenant_id, name, description, status, created_by)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(auth.tenant_id)
    .bind(&payload.name)
    .bind(payload.description.as_deref().unwrap_or(""))
    .bind(payload.status.unwrap_or(ProjectStatus::Active))
    .bind(auth.user_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    audit::record(
        &pool,
        auth.tenant_id,
        auth.user_id,
        audit::actions::CREATE_PROJECT,
        audit::entities::PROJECT,
        &project.id.to_string(),
        None,
    )
    .await;

    Ok(ApiResponse::created(json!({
        "id": project.id,
        "name": project.name,
        "description": project.description,
        "status": project.status,
        "createdAt": project.created_at,
    })))
}
