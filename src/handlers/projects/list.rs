// GET /api/projects - tenant-scoped unless super_admin

use axum::extract::Query;
use axum::Extension;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::ProjectStatus;
use crate::error::ApiError;
use crate::filter::{ListQuery, Pagination};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiResponse;
use crate::policy;

#[derive(Debug, Deserialize)]
pub struct ListProjectsParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, FromRow)]
struct ProjectRow {
    id: Uuid,
    name: String,
    description: String,
    status: ProjectStatus,
    created_at: DateTime<Utc>,
    creator_id: Option<Uuid>,
    creator_name: Option<String>,
    organization_name: Option<String>,
}

pub async fn list_projects(
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListProjectsParams>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let principal = auth.principal();
    let page = Pagination::clamped(params.page, params.limit, 20);

    let mut query = ListQuery::new();
    query.tenant_scope("p.tenant_id", principal.tenant_scope());
    if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
        query.search(&["p.name"], search);
    }
    if let Some(status) = params.status {
        query.eq_enum("p.status", "project_status", status.db_value());
    }

    let pool = DatabaseManager::pool().await?;
    let total = query.fetch_count(&pool, "projects p").await?;

    // The tenant name rides along so the operator view can attribute rows
    // across organizations.
    let rows: Vec<ProjectRow> = query
        .fetch_page(
            &pool,
            r#"
            SELECT
                p.id, p.name, p.description, p.status, p.created_at,
                u.id AS creator_id,
                u.full_name AS creator_name,
                ten.name AS organization_name
            FROM projects p
            LEFT JOIN users u ON p.created_by = u.id
            LEFT JOIN tenants ten ON p.tenant_id = ten.id
            "#,
            "p.created_at DESC",
            &page,
        )
        .await?;

    let projects: Vec<serde_json::Value> = rows
        .into_iter()
        .map(|row| {
            json!({
                "id": row.id,
                "name": row.name,
                "description": row.description,
                "status": row.status,
                "organization": row.organization_name,
                "createdBy": {
                    "id": row.creator_id,
                    "fullName": row.creator_name,
                },
                "createdAt": row.created_at,
            })
        })
        .collect();

    Ok(ApiResponse::success(json!({
        "projects": projects,
        "total": total,
        "pagination": {
            "currentPage": page.page,
            "totalPages": page.total_pages(total),
            "totalItems": total,
            "limit": page.limit,
        }
    })))
}
