// POST /api/tenants/:tenantId/users - provision a member, quota-guarded

use axum::extract::Path;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::audit;
use crate::auth::password;
use crate::database::manager::DatabaseManager;
use crate::database::models::{Role, SubscriptionPlan, User};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    pub role: Option<Role>,
}

/// Creation runs inside one transaction that locks the tenant row before the
/// count check, so two concurrent requests cannot both slip under the limit.
/// Plan quotas bind even for super_admin.
pub async fn add_user(
    Extension(auth): Extension<AuthUser>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<AddUserRequest>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    policy::add_user(&auth.principal(), tenant_id)?;

    if payload.email.is_empty() || payload.password.is_empty() || payload.full_name.is_empty() {
        return Err(ApiError::bad_request("Email, Password, and Name are required"));
    }

    // The API can hand out tenant_admin or user; super_admin is never
    // provisioned this way.
    let role = match payload.role {
        Some(Role::TenantAdmin) => Role::TenantAdmin,
        _ => Role::User,
    };

    // Hash before opening the transaction; argon2 is deliberately slow and
    // must not run while holding the tenant row lock.
    let password_hash = password::hash_password(&payload.password)?;

    let pool = DatabaseManager::pool().await?;
    let mut tx = pool.begin().await?;

    let tenant: Option<(SubscriptionPlan, i32)> =
        sqlx::query_as("SELECT subscription_plan, max_users FROM tenants WHERE id = $1 FOR UPDATE")
            .bind(tenant_id)
            .fetch_optional(&mut *tx)
            .await?;
    let (plan, max_users) = tenant.ok_or_else(|| ApiError::not_found("Organization not found"))?;

    let current: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE tenant_id = $1")
        .bind(tenant_id)
        .fetch_one(&mut *tx)
        .await?;

    policy::user_quota(plan, max_users, current)?;

    let duplicate: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1 AND tenant_id = $2")
            .bind(&payload.email)
            .bind(tenant_id)
            .fetch_optional(&mut *tx)
            .await?;
    if duplicate.is_some() {
        return Err(ApiError::conflict("User already exists in this organization."));
    }

    let new_user: User = sqlx::query_as(
        r#"
        INSERT INTO users (tenant_id, email, password_hash, full_name, role, is_active)
        VALUES ($1, $2, $3, $4, $5, true)
        RETURNING *
        "#,
    )
    .bind(tenant_id)
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(&payload.full_name)
    .bind(role)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    audit::record(
        &pool,
        tenant_id,
        auth.user_id,
        audit::actions::ADD_USER,
        audit::entities::USER,
        &new_user.id.to_string(),
        None,
    )
    .await;

    Ok(ApiResponse::created(json!({
        "id": new_user.id,
        "email": new_user.email,
        "fullName": new_user.full_name,
        "role": new_user.role,
        "createdAt": new_user.created_at,
    })))
}
