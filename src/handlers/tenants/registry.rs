// GET /api/admin/tenantdet - operator view of every customer organization
// with real usage against plan limits

use axum::Extension;
use serde::Serialize;
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::SubscriptionPlan;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy;

#[derive(Debug, FromRow, Serialize)]
struct RegistryRow {
    id: Uuid,
    name: String,
    subdomain: String,
    subscription_plan: SubscriptionPlan,
    max_users: i32,
    max_projects: i32,
    current_users_count: i64,
    current_projects_count: i64,
}

pub async fn tenant_registry(
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    policy::tenant_registry(&auth.principal())?;

    let pool = DatabaseManager::pool().await?;

    // Organizations without a tenant_admin are operator-internal (e.g. the
    // super_admin's own shell tenant) and stay hidden from the registry.
    let rows: Vec<RegistryRow> = sqlx::query_as(
        r#"
        SELECT DISTINCT ON (t.id)
            t.id,
            t.name,
            t.subdomain,
            t.subscription_plan,
            t.max_users,
            t.max_projects,
            (SELECT COUNT(*) FROM users u WHERE u.tenant_id = t.id) AS current_users_count,
            (SELECT COUNT(*) FROM projects p WHERE p.tenant_id = t.id) AS current_projects_count
        FROM tenants t
        INNER JOIN users u ON t.id = u.tenant_id
        WHERE u.role = 'tenant_admin'
        ORDER BY t.id, t.created_at DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(json!({ "tenants": rows })))
}
