// PUT /api/tenants/:tenantId - super_admin edits anything, a tenant_admin
// may rename their own organization and nothing else

use axum::extract::Path;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::audit;
use crate::database::manager::DatabaseManager;
use crate::database::models::{SubscriptionPlan, TenantStatus};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy::{self, TenantUpdateFields};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantRequest {
    pub name: Option<String>,
    pub status: Option<TenantStatus>,
    pub subscription_plan: Option<SubscriptionPlan>,
    pub max_users: Option<i32>,
    pub max_projects: Option<i32>,
}

#[derive(Debug, FromRow)]
struct UpdatedTenant {
    id: Uuid,
    name: String,
    status: TenantStatus,
    subscription_plan: SubscriptionPlan,
    max_users: i32,
    max_projects: i32,
}

pub async fn update_tenant(
    Extension(auth): Extension<AuthUser>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<UpdateTenantRequest>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let fields = TenantUpdateFields {
        name: payload.name.is_some(),
        status: payload.status.is_some(),
        plan: payload.subscription_plan.is_some(),
        limits: payload.max_users.is_some() || payload.max_projects.is_some(),
    };
    policy::update_tenant(&auth.principal(), tenant_id, &fields)?;

    let mut sets = Vec::new();
    let mut idx = 1;
    if payload.name.is_some() {
        sets.push(format!("name = ${}", idx));
        idx += 1;
    }
    if payload.status.is_some() {
        sets.push(format!("status = ${}", idx));
        idx += 1;
    }
    if payload.subscription_plan.is_some() {
        sets.push(format!("subscription_plan = ${}", idx));
        idx += 1;
    }
    if payload.max_users.is_some() {
        sets.push(format!("max_users = ${}", idx));
        idx += 1;
    }
    if payload.max_projects.is_some() {
        sets.push(format!("max_projects = ${}", idx));
        idx += 1;
    }

    if sets.is_empty() {
        return Err(ApiError::bad_request("No fields provided for update"));
    }

    let sql = format!(
        "UPDATE tenants SET {}, updated_at = NOW() WHERE id = ${} \
         RETURNING id, name, status, subscription_plan, max_users, max_projects",
        sets.join(", "),
        idx
    );

    let pool = DatabaseManager::pool().await?;
    let mut query = sqlx::query_as::<_, UpdatedTenant>(&sql);
    if let Some(name) = &payload.name {
        query = query.bind(name);
    }
    if let Some(status) = payload.status {
        query = query.bind(status);
    }
    if let Some(plan) = payload.subscription_plan {
        query = query.bind(plan);
    }
    if let Some(max_users) = payload.max_users {
        query = query.bind(max_users);
    }
    if let Some(max_projects) = payload.max_projects {
        query = query.bind(max_projects);
    }
    query = query.bind(tenant_id);

    let updated = query
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Tenant not found"))?;

    audit::record(
        &pool,
        tenant_id,
        auth.user_id,
        audit::actions::UPDATE_TENANT,
        audit::entities::TENANT,
        &tenant_id.to_string(),
        None,
    )
    .await;

    Ok(ApiResponse::success(json!({
        "id": updated.id,
        "name": updated.name,
        "status": updated.status,
        "subscriptionPlan": updated.subscription_plan,
        "maxUsers": updated.max_users,
        "maxProjects": updated.max_projects,
    })))
}
