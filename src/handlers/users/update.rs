// PUT /api/users/:userId - self-service profile edits or admin edits

use axum::extract::Path;
use axum::{Extension, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::audit;
use crate::database::manager::DatabaseManager;
use crate::database::models::Role;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Debug, FromRow)]
struct UpdatedUser {
    id: Uuid,
    full_name: String,
    role: Role,
    is_active: bool,
}

pub async fn update_user(
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let target: Option<(Uuid, Uuid)> =
        sqlx::query_as("SELECT id, tenant_id FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&pool)
            .await?;
    let (target_id, target_tenant) = target.ok_or_else(|| ApiError::not_found("User not found"))?;

    let scope = policy::update_user(&auth.principal(), target_id, target_tenant)?;
    // Supplying role/isActive on a self-scoped update is an explicit 403,
    // never a silent drop.
    policy::check_update_fields(scope, payload.role.is_some(), payload.is_active.is_some())?;

    let mut sets = Vec::new();
    let mut idx = 1;
    if payload.full_name.is_some() {
        sets.push(format!("full_name = ${}", idx));
        idx += 1;
    }
    if payload.role.is_some() {
        sets.push(format!("role = ${}", idx));
        idx += 1;
    }
    if payload.is_active.is_some() {
        sets.push(format!("is_active = ${}", idx));
        idx += 1;
    }

    if sets.is_empty() {
        return Err(ApiError::bad_request("No valid fields provided for update"));
    }

    let sql = format!(
        "UPDATE users SET {} WHERE id = ${} RETURNING id, full_name, role, is_active",
        sets.join(", "),
        idx
    );

    let mut query = sqlx::query_as::<_, UpdatedUser>(&sql);
    if let Some(full_name) = &payload.full_name {
        query = query.bind(full_name);
    }
    if let Some(role) = payload.role {
        query = query.bind(role);
    }
    if let Some(is_active) = payload.is_active {
        query = query.bind(is_active);
    }
    query = query.bind(user_id);

    let updated = query.fetch_one(&pool).await?;

    audit::record(
        &pool,
        target_tenant,
        auth.user_id,
        audit::actions::UPDATE_USER,
        audit::entities::USER,
        &user_id.to_string(),
        None,
    )
    .await;

    Ok(ApiResponse::success(json!({
        "id": updated.id,
        "fullName": updated.full_name,
        "role": updated.role,
        "isActive": updated.is_active,
        "updatedAt": Utc::now(),
    })))
}
