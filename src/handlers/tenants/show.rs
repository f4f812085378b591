// GET /api/tenants/:tenantId - organization details with usage stats

use axum::extract::Path;
use axum::Extension;
use serde_json::json;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::Tenant;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy;

pub async fn show_tenant(
    Extension(auth): Extension<AuthUser>,
    Path(tenant_id): Path<Uuid>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    policy::view_tenant(&auth.principal(), tenant_id)?;

    let pool = DatabaseManager::pool().await?;

    let tenant: Option<Tenant> = sqlx::query_as("SELECT * FROM tenants WHERE id = $1")
        .bind(tenant_id)
        .fetch_optional(&pool)
        .await?;
    let tenant = tenant.ok_or_else(|| ApiError::not_found("Tenant not found"))?;

    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE tenant_id = $1")
        .bind(tenant_id)
        .fetch_one(&pool)
        .await?;
    let total_projects: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE tenant_id = $1")
        .bind(tenant_id)
        .fetch_one(&pool)
        .await?;
    let total_tasks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE tenant_id = $1")
        .bind(tenant_id)
        .fetch_one(&pool)
        .await?;

    Ok(ApiResponse::success(json!({
        "id": tenant.id,
        "name": tenant.name,
        "subdomain": tenant.subdomain,
        "status": tenant.status,
        "subscriptionPlan": tenant.subscription_plan,
        "maxUsers": tenant.max_users,
        "maxProjects": tenant.max_projects,
        "createdAt": tenant.created_at,
        "stats": {
            "totalUsers": total_users,
            "totalProjects": total_projects,
            "totalTasks": total_tasks,
        }
    })))
}
