// DELETE /api/tasks/:taskId

use axum::extract::Path;
use axum::Extension;
use uuid::Uuid;

use crate::audit;
use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiMessage;

/// Tenant membership is the only requirement; the single statement filters
/// on both id and tenant_id, so a cross-tenant id reads as absent.
pub async fn delete_task(
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
) -> Result<ApiMessage, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND tenant_id = $2")
        .bind(task_id)
        .bind(auth.tenant_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found(
            "Task not found or you don't have permission to delete it.",
        ));
    }

    audit::record(
        &pool,
        auth.tenant_id,
        auth.user_id,
        audit::actions::DELETE_TASK,
        audit::entities::TASK,
        &task_id.to_string(),
        None,
    )
    .await;

    Ok(ApiMessage::ok("Task deleted successfully."))
}
