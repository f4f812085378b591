// POST /api/auth/register-tenant - public tenant signup

use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;
use crate::services::registration::{self, RegistrationInput};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTenantRequest {
    #[serde(default)]
    pub tenant_name: String,
    #[serde(default)]
    pub subdomain: String,
    #[serde(default)]
    pub admin_email: String,
    #[serde(default)]
    pub admin_password: String,
    #[serde(default)]
    pub admin_full_name: String,
}

/// Creates the organization and its first tenant_admin atomically.
/// Duplicate subdomain or email comes back as a 409 naming the field.
pub async fn register_tenant(
    Json(payload): Json<RegisterTenantRequest>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    if payload.tenant_name.is_empty()
        || payload.subdomain.is_empty()
        || payload.admin_email.is_empty()
        || payload.admin_password.is_empty()
        || payload.admin_full_name.is_empty()
    {
        return Err(ApiError::bad_request("All fields are required"));
    }

    let pool = DatabaseManager::pool().await?;

    let (tenant, admin) = registration::register_tenant(
        &pool,
        RegistrationInput {
            tenant_name: payload.tenant_name,
            subdomain: payload.subdomain,
            admin_email: payload.admin_email,
            admin_password: payload.admin_password,
            admin_full_name: payload.admin_full_name,
        },
    )
    .await?;

    Ok(ApiResponse::created(json!({
        "tenantId": tenant.id,
        "subdomain": tenant.subdomain,
        "adminUser": {
            "id": admin.id,
            "email": admin.email,
            "fullName": admin.full_name,
            "role": admin.role,
        }
    })))
}
