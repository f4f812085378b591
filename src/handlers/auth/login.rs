// POST /api/auth/login - credential check + token issuance

use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::audit;
use crate::auth::{self, password, Claims};
use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::models::{TenantStatus, User};
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub tenants_subdomain: String,
}

/// The subdomain picks the tenant whose user table is searched; an inactive
/// organization refuses logins outright. Credential failures are reported
/// uniformly so callers cannot distinguish unknown email from bad password.
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() || payload.tenants_subdomain.is_empty() {
        return Err(ApiError::bad_request("Missing fields"));
    }

    let pool = DatabaseManager::pool().await?;

    let tenant: Option<(Uuid, TenantStatus)> =
        sqlx::query_as("SELECT id, status FROM tenants WHERE subdomain = $1")
            .bind(&payload.tenants_subdomain)
            .fetch_optional(&pool)
            .await?;

    let (tenant_id, status) = tenant.ok_or_else(|| ApiError::not_found("Tenant/Organization not found"))?;

    if status != TenantStatus::Active {
        return Err(ApiError::forbidden("Organization inactive"));
    }

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1 AND tenant_id = $2")
        .bind(&payload.email)
        .bind(tenant_id)
        .fetch_optional(&pool)
        .await?;

    let user = user.ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let claims = Claims::new(user.id, tenant_id, user.role);
    let token = auth::generate_jwt(&claims)?;
    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    audit::record(
        &pool,
        tenant_id,
        user.id,
        audit::actions::LOGIN,
        audit::entities::AUTH,
        &user.id.to_string(),
        None,
    )
    .await;

    Ok(ApiResponse::success(json!({
        "user": {
            "id": user.id,
            "email": user.email,
            "fullName": user.full_name,
            "role": user.role,
            "tenantId": tenant_id,
        },
        "token": token,
        "expiresIn": expires_in,
    })))
}
