use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "tenant_status", rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Inactive,
}

impl TenantStatus {
    pub const fn db_value(self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Inactive => "inactive",
        }
    }
}

/// Subscription tier. Stored lowercase in Postgres; the wire contract uses
/// capitalized names ("Free", "Pro", "Enterprise").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "PascalCase")]
#[sqlx(type_name = "subscription_plan", rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Free,
    Pro,
    Enterprise,
}

/// Per-plan numeric ceilings. Shrinking limits on a downgrade never evicts
/// existing rows; it only blocks further creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    pub max_users: i32,
    pub max_projects: i32,
}

impl SubscriptionPlan {
    pub const fn limits(self) -> PlanLimits {
        match self {
            SubscriptionPlan::Free => PlanLimits { max_users: 5, max_projects: 3 },
            SubscriptionPlan::Pro => PlanLimits { max_users: 25, max_projects: 15 },
            SubscriptionPlan::Enterprise => PlanLimits { max_users: 100, max_projects: 50 },
        }
    }

    /// Wire name, e.g. "Pro"
    pub const fn as_str(self) -> &'static str {
        match self {
            SubscriptionPlan::Free => "Free",
            SubscriptionPlan::Pro => "Pro",
            SubscriptionPlan::Enterprise => "Enterprise",
        }
    }

    /// Stored (lowercase) form, used when filtering by plan
    pub const fn db_value(self) -> &'static str {
        match self {
            SubscriptionPlan::Free => "free",
            SubscriptionPlan::Pro => "pro",
            SubscriptionPlan::Enterprise => "enterprise",
        }
    }

    /// Uppercase tag used in audit actions, e.g. "UPGRADE_TO_PRO"
    pub const fn audit_suffix(self) -> &'static str {
        match self {
            SubscriptionPlan::Free => "FREE",
            SubscriptionPlan::Pro => "PRO",
            SubscriptionPlan::Enterprise => "ENTERPRISE",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub subdomain: String,
    pub status: TenantStatus,
    pub subscription_plan: SubscriptionPlan,
    pub max_users: i32,
    pub max_projects: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_limits_match_pricing_table() {
        assert_eq!(SubscriptionPlan::Free.limits(), PlanLimits { max_users: 5, max_projects: 3 });
        assert_eq!(SubscriptionPlan::Pro.limits(), PlanLimits { max_users: 25, max_projects: 15 });
        assert_eq!(
            SubscriptionPlan::Enterprise.limits(),
            PlanLimits { max_users: 100, max_projects: 50 }
        );
    }

    #[test]
    fn plan_wire_names_are_capitalized() {
        let v = serde_json::to_value(SubscriptionPlan::Pro).unwrap();
        assert_eq!(v, serde_json::json!("Pro"));
        let p: SubscriptionPlan = serde_json::from_value(serde_json::json!("Enterprise")).unwrap();
        assert_eq!(p, SubscriptionPlan::Enterprise);
    }
}
