// PUT /api/projects/:projectId - creator or tenant_admin only

use axum::extract::Path;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::audit;
use crate::database::manager::DatabaseManager;
use crate::database::models::ProjectStatus;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy;

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, FromRow)]
struct UpdatedProject {
    id: Uuid,
    name: String,
    description: String,
    status: ProjectStatus,
    updated_at: DateTime<Utc>,
}

pub async fn update_project(
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let target: Option<(Uuid, Uuid, Uuid)> =
        sqlx::query_as("SELECT id, tenant_id, created_by FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(&pool)
            .await?;
    let (_, project_tenant, created_by) =
        target.ok_or_else(|| ApiError::not_found("Project not found"))?;

    policy::modify_project(&auth.principal(), project_tenant, created_by)?;

    let mut sets = Vec::new();
    let mut idx = 1;
    if payload.name.is_some() {
        sets.push(format!("name = ${}", idx));
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

    if sets.is_empty() {
        return Err(ApiError::bad_request("No fields provided for update"));
    }

    let sql = format!(
        "UPDATE projects SET {}, updated_at = NOW() WHERE id = ${} \
         RETURNING id, name, description, status, updated_at",
        sets.join(", "),
        idx
    );

    let mut query = sqlx::query_as::<_, UpdatedProject>(&sql);
    if let Some(name) = &payload.name {
        query = query.bind(name);
    }
    if let Some(description) = &payload.description {
        query = query.bind(description);
    }
    if let Some(status) = payload.status {
        query = query.bind(status);
    }
    query = query.bind(project_id);

    let updated = query.fetch_one(&pool).await?;

    audit::record(
        &pool,
        project_tenant,
        auth.user_id,
        audit::actions::UPDATE_PROJECT,
        audit::entities::PROJECT,
        &project_id.to_string(),
        None,
    )
    .await;

    Ok(ApiResponse::success(json!({
        "id": updated.id,
        "name": updated.name,
        "description": updated.description,
        "status": updated.status,
        "updatedAt": updated.updated_at,
    })))
}
