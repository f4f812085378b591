//! Tenant registration: one transaction creating the organization, its first
//! admin and the audit record. Either everything commits or nothing does, so
//! no tenant ever exists without an admin and no admin without a tenant.

use sqlx::PgPool;

use crate::audit;
use crate::auth::password::{self, PasswordError};
use crate::database::models::{Role, SubscriptionPlan, Tenant, TenantStatus, User};

#[derive(Debug, Clone)]
pub struct RegistrationInput {
    pub tenant_name: String,
    pub subdomain: String,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_full_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Subdomain is already taken")]
    DuplicateSubdomain,

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// New tenants start on the Free plan with its limits materialized onto the
/// row; the first user is always a tenant_admin.
pub async fn register_tenant(
    pool: &PgPool,
    input: RegistrationInput,
) -> Result<(Tenant, User), RegistrationError> {
    let password_hash = password::hash_password(&input.admin_password)?;
    let plan = SubscriptionPlan::Free;
    let limits = plan.limits();

    let mut tx = pool.begin().await?;

    let tenant: Tenant = sqlx::query_as(
        r#"
        INSERT INTO tenants (name, subdomain, status, subscription_plan, max_users, max_projects)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&input.tenant_name)
    .bind(&input.subdomain)
    .bind(TenantStatus::Active)
    .bind(plan)
    .bind(limits.max_users)
    .bind(limits.max_projects)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_unique_violation)?;

    let admin: User = sqlx::query_as(
        r#"
        INSERT INTO users (tenant_id, email, password_hash, full_name, role, is_active)
        VALUES ($1, $2, $3, $4, $5, true)
        RETURNING *
        "#,
    )
    .bind(tenant.id)
    .bind(&input.admin_email)
    .bind(&password_hash)
    .bind(&input.admin_full_name)
    .bind(Role::TenantAdmin)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_unique_violation)?;

    // Registration is the one place where the audit row is transactional
    // with the primary mutation.
    audit::record_tx(
        &mut tx,
        tenant.id,
        admin.id,
        audit::actions::REGISTER_TENANT,
        audit::entities::TENANT,
        &tenant.id.to_string(),
    )
    .await?;

    tx.commit().await?;

    Ok((tenant, admin))
}

/// Distinguish which unique constraint collided so the caller can report
/// the offending field.
fn map_unique_violation(err: sqlx::Error) -> RegistrationError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            if let Some(constraint) = db_err.constraint() {
                if constraint.contains("subdomain") {
                    return RegistrationError::DuplicateSubdomain;
                }
                if constraint.contains("email") {
                    return RegistrationError::DuplicateEmail;
                }
            }
        }
    }
    RegistrationError::Database(err)
}

impl From<RegistrationError> for crate::error::ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::DuplicateSubdomain | RegistrationError::DuplicateEmail => {
                crate::error::ApiError::conflict(err.to_string())
            }
            RegistrationError::Password(e) => e.into(),
            RegistrationError::Database(e) => e.into(),
        }
    }
}
