// POST /api/auth/logout

use axum::Extension;

use crate::audit;
use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::ApiMessage;

/// Tokens are stateless, so logout only leaves an audit trace; the token
/// itself simply ages out.
pub async fn logout(Extension(auth): Extension<AuthUser>) -> Result<ApiMessage, ApiError> {
    let pool = DatabaseManager::pool().await?;

    audit::record(
        &pool,
        auth.tenant_id,
        auth.user_id,
        audit::actions::LOGOUT,
        audit::entities::AUTH,
        &auth.user_id.to_string(),
        None,
    )
    .await;

    Ok(ApiMessage::ok("Logged out successfully"))
}
