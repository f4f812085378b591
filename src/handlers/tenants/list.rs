// GET /api/tenants - global tenant listing, super_admin only

use axum::extract::Query;
use axum::Extension;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{SubscriptionPlan, TenantStatus};
use crate::error::ApiError;
use crate::filter::{ListQuery, Pagination};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTenantsParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<TenantStatus>,
    pub subscription_plan: Option<SubscriptionPlan>,
}

#[derive(Debug, FromRow)]
struct TenantRow {
    id: Uuid,
    name: String,
    subdomain: String,
    status: TenantStatus,
    subscription_plan: SubscriptionPlan,
    created_at: DateTime<Utc>,
    total_users: i64,
    total_projects: i64,
}

pub async fn list_tenants(
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListTenantsParams>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    policy::list_tenants(&auth.principal())?;

    let page = Pagination::clamped(params.page, params.limit, 10);

    let mut query = ListQuery::new();
    if let Some(status) = params.status {
        query.eq_enum("status", "tenant_status", status.db_value());
    }
    if let Some(plan) = params.subscription_plan {
        query.eq_enum("subscription_plan", "subscription_plan", plan.db_value());
    }

    let pool = DatabaseManager::pool().await?;
    let total = query.fetch_count(&pool, "tenants").await?;

    let rows: Vec<TenantRow> = query
        .fetch_page(
            &pool,
            r#"
            SELECT
                t.id, t.name, t.subdomain, t.status, t.subscription_plan, t.created_at,
                (SELECT COUNT(*) FROM users u WHERE u.tenant_id = t.id) AS total_users,
                (SELECT COUNT(*) FROM projects p WHERE p.tenant_id = t.id) AS total_projects
            FROM tenants t
            "#,
            "t.created_at DESC",
            &page,
        )
        .await?;

    let tenants: Vec<serde_json::Value> = rows
        .into_iter()
        .map(|row| {
            json!({
                "id": row.id,
                "name": row.name,
                "subdomain": row.subdomain,
                "status": row.status,
                "subscriptionPlan": row.subscription_plan,
                "totalUsers": row.total_users,
                "totalProjects": row.total_projects,
                "createdAt": row.created_at,
            })
        })
        .collect();

    Ok(ApiResponse::success(json!({
        "tenants": tenants,
        "pagination": {
            "currentPage": page.page,
            "totalPages": page.total_pages(total),
            "totalTenants": total,
            "limit": page.limit,
        }
    })))
}
