// PUT/DELETE /api/tenants/settings - the calling admin's own organization

use axum::{Extension, Json};
use serde::Deserialize;

use crate::audit;
use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiMessage;
use crate::policy;

#[derive(Debug, Deserialize)]
pub struct RenameTenantRequest {
    #[serde(default)]
    pub name: String,
}

pub async fn rename_tenant(
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<RenameTenantRequest>,
) -> Result<ApiMessage, ApiError> {
    policy::rename_tenant(&auth.principal())?;

    let name = payload.name.trim();
    if name.len() < 2 {
        return Err(ApiError::bad_request("A valid organization name is required."));
    }

    let pool = DatabaseManager::pool().await?;
    sqlx::query("UPDATE tenants SET name = $1, updated_at = NOW() WHERE id = $2")
        .bind(name)
        .bind(auth.tenant_id)
        .execute(&pool)
        .await?;

    audit::record(
        &pool,
        auth.tenant_id,
        auth.user_id,
        audit::actions::UPDATE_TENANT,
        audit::entities::TENANT,
        &auth.tenant_id.to_string(),
        None,
    )
    .await;

    Ok(ApiMessage::ok("Organization name updated successfully."))
}

/// Permanent removal; users, projects, tasks and audit logs go with it via
/// the FK cascades.
pub async fn delete_tenant(Extension(auth): Extension<AuthUser>) -> Result<ApiMessage, ApiError> {
    policy::delete_tenant(&auth.principal())?;

    let pool = DatabaseManager::pool().await?;
    let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
        .bind(auth.tenant_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Organization not found."));
    }

    Ok(ApiMessage::ok("Organization and all associated data have been permanently deleted."))
}
