use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use teamspace_api::database::manager::DatabaseManager;
use teamspace_api::handlers;
use teamspace_api::middleware::auth::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = teamspace_api::config::config();
    tracing::info!("Starting Teamspace API in {:?} mode", config.environment);

    tracing_subscriber::fmt::init();

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("TEAMSPACE_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Teamspace API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    let protected = Router::new()
        .merge(auth_routes())
        .merge(tenant_routes())
        .merge(user_routes())
        .merge(project_routes())
        .merge(task_routes())
        .merge(subscription_routes())
        .merge(stats_routes())
        .layer(axum::middleware::from_fn(jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/api/health", get(health))
        // Public auth routes (token acquisition)
        .merge(auth_public_routes())
        // Everything else requires a bearer token
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use axum::routing::post;
    use handlers::auth;

    Router::new()
        .route("/api/auth/register-tenant", post(auth::register_tenant))
        .route("/api/auth/login", post(auth::login))
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use handlers::auth;

    Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::current_user))
}

fn tenant_routes() -> Router {
    use axum::routing::put;
    use handlers::tenants;

    Router::new()
        .route("/api/tenants", get(tenants::list_tenants))
        // Static segment takes precedence over the :tenantId capture
        .route(
            "/api/tenants/settings",
            put(tenants::rename_tenant).delete(tenants::delete_tenant),
        )
        .route(
            "/api/tenants/:tenantId",
            get(tenants::show_tenant).put(tenants::update_tenant),
        )
        .route("/api/admin/tenantdet", get(tenants::tenant_registry))
}

fn user_routes() -> Router {
    use handlers::users;

    Router::new()
        .route(
            "/api/tenants/:tenantId/users",
            get(users::list_users).post(users::add_user),
        )
        .route(
            "/api/users/:userId",
            axum::routing::put(users::update_user).delete(users::delete_user),
        )
}

fn project_routes() -> Router {
    use handlers::projects;

    Router::new()
        .route(
            "/api/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/api/projects/:projectId",
            axum::routing::put(projects::update_project).delete(projects::delete_project),
        )
}

fn task_routes() -> Router {
    use axum::routing::patch;
    use handlers::tasks;

    Router::new()
        .route(
            "/api/projects/:projectId/tasks",
            get(tasks::list_project_tasks).post(tasks::create_task),
        )
        .route("/api/tasks/:taskId/status", patch(tasks::update_task_status))
        .route(
            "/api/tasks/:taskId",
            axum::routing::put(tasks::update_task).delete(tasks::delete_task),
        )
}

fn subscription_routes() -> Router {
    use handlers::subscription;

    Router::new().route(
        "/api/subscription",
        get(subscription::get_subscription).put(subscription::update_subscription),
    )
}

fn stats_routes() -> Router {
    use handlers::stats;

    Router::new()
        .route("/api/stats/dashboard", get(stats::dashboard_stats))
        .route("/api/stats/project-tasks", get(stats::project_task_counts))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Teamspace API",
            "version": version,
            "description": "Multi-tenant SaaS backend for organizations, projects and tasks",
            "endpoints": {
                "home": "/ (public)",
                "health": "/api/health (public)",
                "auth": "/api/auth/register-tenant, /api/auth/login (public), /api/auth/logout|me (protected)",
                "tenants": "/api/tenants[/:id], /api/tenants/settings (protected)",
                "users": "/api/tenants/:id/users, /api/users/:id (protected)",
                "projects": "/api/projects[/:id] (protected)",
                "tasks": "/api/projects/:id/tasks, /api/tasks/:id[/status] (protected)",
                "subscription": "/api/subscription (protected)",
                "stats": "/api/stats/dashboard, /api/stats/project-tasks (protected)",
                "admin": "/api/admin/tenantdet (super_admin)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
