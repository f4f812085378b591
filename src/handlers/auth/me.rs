// GET /api/auth/me - profile of the authenticated caller

use axum::Extension;
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Role, SubscriptionPlan};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;

#[derive(Debug, FromRow)]
struct MeRow {
    id: Uuid,
    email: String,
    full_name: String,
    role: Role,
    is_active: bool,
    tenant_id: Uuid,
    tenant_name: String,
    subdomain: String,
    subscription_plan: SubscriptionPlan,
}

pub async fn current_user(
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let row: Option<MeRow> = sqlx::query_as(
        r#"
        SELECT
            u.id, u.email, u.full_name, u.role, u.is_active,
            t.id AS tenant_id, t.name AS tenant_name, t.subdomain, t.subscription_plan
        FROM users u
        JOIN tenants t ON u.tenant_id = t.id
        WHERE u.id = $1 AND t.id = $2
        "#,
    )
    .bind(auth.user_id)
    .bind(auth.tenant_id)
    .fetch_optional(&pool)
    .await?;

    let row = row.ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(json!({
        "id": row.id,
        "email": row.email,
        "fullName": row.full_name,
        "role": row.role,
        "isActive": row.is_active,
        "tenant": {
            "id": row.tenant_id,
            "name": row.tenant_name,
            "subdomain": row.subdomain,
            "subscriptionPlan": row.subscription_plan,
        }
    })))
}
