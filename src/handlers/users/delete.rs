// DELETE /api/users/:userId - hard delete by a same-tenant admin

use axum::extract::Path;
use axum::Extension;
use uuid::Uuid;

use crate::audit;
use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiMessage;
use crate::policy;

pub async fn delete_user(
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> Result<ApiMessage, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let target: Option<(Uuid, Uuid)> =
        sqlx::query_as("SELECT id, tenant_id FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&pool)
            .await?;
    let (target_id, target_tenant) = target.ok_or_else(|| ApiError::not_found("User not found"))?;

    policy::delete_user(&auth.principal(), target_id, target_tenant)?;

    // Record first: audit_logs.user_id carries no FK, so the row survives
    // the deletion it describes.
    audit::record(
        &pool,
        target_tenant,
        auth.user_id,
        audit::actions::DELETE_USER,
        audit::entities::USER,
        &user_id.to_string(),
        None,
    )
    .await;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await?;

    Ok(ApiMessage::ok("User deleted successfully"))
}
