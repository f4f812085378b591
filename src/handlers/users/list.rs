// GET /api/tenants/:tenantId/users

use axum::extract::{Path, Query};
use axum::Extension;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::Role;
use crate::error::ApiError;
use crate::filter::{ListQuery, Pagination};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy;

#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    full_name: String,
    role: Role,
    is_active: bool,
    created_at: DateTime<Utc>,
}

pub async fn list_users(
    Extension(auth): Extension<AuthUser>,
    Path(tenant_id): Path<Uuid>,
    Query(params): Query<ListUsersParams>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    policy::list_users(&auth.principal(), tenant_id)?;

    let page = Pagination::clamped(params.page, params.limit, 50);

    // Always scoped to the path tenant, even for super_admin.
    let mut query = ListQuery::new();
    query.eq_uuid("tenant_id", tenant_id);
    if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
        query.search(&["full_name", "email"], search);
    }
    if let Some(role) = params.role {
        query.eq_enum("role", "user_role", role.db_value());
    }

    let pool = DatabaseManager::pool().await?;
    let total = query.fetch_count(&pool, "users").await?;

    let rows: Vec<UserRow> = query
        .fetch_page(
            &pool,
            "SELECT id, email, full_name, role, is_active, created_at FROM users",
            "created_at DESC",
            &page,
        )
        .await?;

    let users: Vec<serde_json::Value> = rows
        .into_iter()
        .map(|user| {
            json!({
                "id": user.id,
                "email": user.email,
                "fullName": user.full_name,
                "role": user.role,
                "isActive": user.is_active,
                "createdAt": user.created_at,
            })
        })
        .collect();

    Ok(ApiResponse::success(json!({
        "users": users,
        "pagination": {
            "currentPage": page.page,
            "totalPages": page.total_pages(total),
            "totalUsers": total,
            "limit": page.limit,
        }
    })))
}
