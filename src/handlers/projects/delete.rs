// DELETE /api/projects/:projectId - creator or tenant_admin; tasks go with
// the project via the FK cascade

use axum::extract::Path;
use axum::Extension;
use uuid::Uuid;

use crate::audit;
use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiMessage;
use crate::policy;

pub async fn delete_project(
    Extension(auth): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
) -> Result<ApiMessage, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let target: Option<(Uuid, Uuid, Uuid)> =
        sqlx::query_as("SELECT id, tenant_id, created_by FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(&pool)
            .await?;
    let (_, project_tenant, created_by) =
        target.ok_or_else(|| ApiError::not_found("Project not found"))?;

    policy::modify_project(&auth.principal(), project_tenant, created_by)?;

    audit::record(
        &pool,
        project_tenant,
        auth.user_id,
        audit::actions::DELETE_PROJECT,
        audit::entities::PROJECT,
        &project_id.to_string(),
        None,
    )
    .await;

    sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(project_id)
        .execute(&pool)
        .await?;

    Ok(ApiMessage::ok("Project deleted successfully"))
}
