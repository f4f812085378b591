// GET/PUT /api/subscription - plan, usage and plan changes for the caller's
// own organization

use axum::http::HeaderMap;
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::audit;
use crate::database::manager::DatabaseManager;
use crate::database::models::SubscriptionPlan;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy;

pub async fn get_subscription(
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let tenant: Option<(SubscriptionPlan, i32, i32)> = sqlx::query_as(
        "SELECT subscription_plan, max_users, max_projects FROM tenants WHERE id = $1",
    )
    .bind(auth.tenant_id)
    .fetch_optional(&pool)
    .await?;
    let (plan, max_users, max_projects) =
        tenant.ok_or_else(|| ApiError::not_found("Tenant not found"))?;

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE tenant_id = $1")
        .bind(auth.tenant_id)
        .fetch_one(&pool)
        .await?;
    let projects_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE tenant_id = $1")
            .bind(auth.tenant_id)
            .fetch_one(&pool)
            .await?;

    Ok(ApiResponse::success(json!({
        "plan": plan,
        "usersCount": users_count,
        "projectsCount": projects_count,
        "maxUsers": max_users,
        "maxProjects": max_projects,
    })))
}

/// Changing plan overwrites the tenant's limits with the new plan's values.
/// A downgrade never evicts existing members or projects; it just makes the
/// next creation fail the quota check.
pub async fn update_subscription(
    Extension(auth): Extension<AuthUser>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    policy::change_subscription(&auth.principal())?;

    let new_plan: SubscriptionPlan = payload
        .get("newPlan")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .ok_or_else(|| ApiError::bad_request("Invalid plan selected."))?;

    let limits = new_plan.limits();

    let pool = DatabaseManager::pool().await?;
    sqlx::query(
        r#"
        UPDATE tenants
        SET subscription_plan = $1,
            max_users = $2,
            max_projects = $3,
            updated_at = NOW()
        WHERE id = $4
        "#,
    )
    .bind(new_plan)
    .bind(limits.max_users)
    .bind(limits.max_projects)
    .bind(auth.tenant_id)
    .execute(&pool)
    .await?;

    audit::record(
        &pool,
        auth.tenant_id,
        auth.user_id,
        &audit::upgrade_action(new_plan),
        audit::entities::SUBSCRIPTION,
        &auth.tenant_id.to_string(),
        Some(client_ip(&headers).as_deref().unwrap_or("0.0.0.0")),
    )
    .await;

    Ok(ApiResponse::success(json!({ "plan": new_plan })))
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn client_ip_takes_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.1.2.3, 172.16.0.9"));
        assert_eq!(client_ip(&headers).as_deref(), Some("10.1.2.3"));
    }

    #[test]
    fn client_ip_absent_without_header() {
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }
}
