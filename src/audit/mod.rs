//! Append-only audit trail for state-changing operations.
//!
//! Every successful mutation records exactly one row before the handler
//! returns. Outside of tenant registration the insert is best-effort: a
//! failure is logged and swallowed, never rolling back a mutation that has
//! already committed.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::warn;
use uuid::Uuid;

pub mod actions {
    pub const REGISTER_TENANT: &str = "REGISTER_TENANT";
    pub const LOGIN: &str = "LOGIN";
    pub const LOGOUT: &str = "LOGOUT";
    pub const ADD_USER: &str = "ADD_USER";
    pub const UPDATE_USER: &str = "UPDATE_USER";
    pub const DELETE_USER: &str = "DELETE_USER";
    pub const CREATE_PROJECT: &str = "CREATE_PROJECT";
    pub const UPDATE_PROJECT: &str = "UPDATE_PROJECT";
    pub const DELETE_PROJECT: &str = "DELETE_PROJECT";
    pub const CREATE_TASK: &str = "CREATE_TASK";
    pub const UPDATE_TASK: &str = "UPDATE_TASK";
    pub const DELETE_TASK: &str = "DELETE_TASK";
    pub const UPDATE_TENANT: &str = "UPDATE_TENANT";
}

pub mod entities {
    pub const AUTH: &str = "AUTH";
    pub const TENANT: &str = "TENANT";
    pub const USER: &str = "USER";
    pub const PROJECT: &str = "PROJECT";
    pub const TASK: &str = "TASK";
    pub const SUBSCRIPTION: &str = "SUBSCRIPTION";
}

const INSERT_SQL: &str = r#"
    INSERT INTO audit_logs (tenant_id, user_id, action, entity_type, entity_id, ip_address)
    VALUES ($1, $2, $3, $4, $5, $6)
"#;

/// Best-effort append. Failure must not fail the primary operation.
pub async fn record(
    pool: &PgPool,
    tenant_id: Uuid,
    user_id: Uuid,
    action: &str,
    entity_type: &str,
    entity_id: &str,
    ip_address: Option<&str>,
) {
    let result = sqlx::query(INSERT_SQL)
        .bind(tenant_id)
        .bind(user_id)
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .bind(ip_address)
        .execute(pool)
        .await;

    if let Err(e) = result {
        warn!(action, %tenant_id, "audit log insert failed: {}", e);
    }
}

/// Transactional append, used only where the audit row must commit or roll
/// back together with the primary mutation (tenant registration).
pub async fn record_tx(
    tx: &mut Transaction<'_, Postgres>,
    tenant_id: Uuid,
    user_id: Uuid,
    action: &str,
    entity_type: &str,
    entity_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(INSERT_SQL)
        .bind(tenant_id)
        .bind(user_id)
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .bind(Option::<&str>::None)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Plan-change action tag, e.g. `UPGRADE_TO_PRO`.
pub fn upgrade_action(plan: crate::database::models::SubscriptionPlan) -> String {
    format!("UPGRADE_TO_{}", plan.audit_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::SubscriptionPlan;

    #[test]
    fn upgrade_action_tags() {
        assert_eq!(upgrade_action(SubscriptionPlan::Pro), "UPGRADE_TO_PRO");
        assert_eq!(upgrade_action(SubscriptionPlan::Free), "UPGRADE_TO_FREE");
        assert_eq!(upgrade_action(SubscriptionPlan::Enterprise), "UPGRADE_TO_ENTERPRISE");
    }
}
