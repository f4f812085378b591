//! Tenant-scoped authorization and plan-quota decisions.
//!
//! Every handler funnels its access decision through this module instead of
//! re-deriving role/tenant comparisons inline, so the tenant-isolation
//! invariant is enforced in exactly one place. Functions here are pure: they
//! take the authenticated principal plus a small descriptor of the target row
//! and return `Ok` or a typed [`Denial`]. Current counts are read by the
//! caller and passed in; this module never touches the database.

use uuid::Uuid;

use crate::database::models::{Role, SubscriptionPlan};

/// The authenticated caller: identity, tenant binding and privilege level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    pub fn is_tenant_admin(&self) -> bool {
        self.role == Role::TenantAdmin
    }

    /// Tenant filter for listing queries: `None` means unscoped
    /// (super_admin sees every tenant's rows).
    pub fn tenant_scope(&self) -> Option<Uuid> {
        if self.is_super_admin() {
            None
        } else {
            Some(self.tenant_id)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaResource {
    Members,
    Projects,
}

/// A refused operation, carrying enough context for the HTTP layer to pick
/// the right status code and payload. Cross-tenant access to projects and
/// tasks is reported as `NotFoundMasked` so callers cannot probe for the
/// existence of rows in other tenants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFoundMasked(String),

    #[error("Operation failed. You cannot delete yourself.")]
    SelfDeleteForbidden,

    #[error("quota exceeded: {current}/{limit}")]
    LimitReached {
        resource: QuotaResource,
        plan: SubscriptionPlan,
        limit: i32,
        current: i64,
    },

    #[error("Assigned user not found in this organization")]
    InvalidAssignee,
}

fn forbidden(msg: &str) -> Denial {
    Denial::Forbidden(msg.to_string())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Provisioning a user into tenant `target_tenant`: super_admin anywhere,
/// tenant_admin only into their own organization.
pub fn add_user(principal: &Principal, target_tenant: Uuid) -> Result<(), Denial> {
    if principal.is_super_admin() {
        return Ok(());
    }
    if principal.is_tenant_admin() && principal.tenant_id == target_tenant {
        return Ok(());
    }
    Err(forbidden("Access denied. Insufficient permissions."))
}

/// Member-count ceiling. Reaching the limit blocks the next creation, so a
/// tenant configured with limit 0 can never add the resource at all. Note
/// there is no principal parameter: super_admin is not exempt from quotas.
pub fn user_quota(plan: SubscriptionPlan, max_users: i32, current: i64) -> Result<(), Denial> {
    if current >= max_users as i64 {
        return Err(Denial::LimitReached {
            resource: QuotaResource::Members,
            plan,
            limit: max_users,
            current,
        });
    }
    Ok(())
}

/// Project-count ceiling; same semantics as [`user_quota`].
pub fn project_quota(plan: SubscriptionPlan, max_projects: i32, current: i64) -> Result<(), Denial> {
    if current >= max_projects as i64 {
        return Err(Denial::LimitReached {
            resource: QuotaResource::Projects,
            plan,
            limit: max_projects,
            current,
        });
    }
    Ok(())
}

/// Hard-deleting a user: tenant_admin of the same tenant only, and never
/// yourself. The self-deletion guard fires even for otherwise-authorized
/// admins.
pub fn delete_user(principal: &Principal, target_id: Uuid, target_tenant: Uuid) -> Result<(), Denial> {
    if !principal.is_tenant_admin() || principal.tenant_id != target_tenant {
        return Err(forbidden("Access denied. Only Tenant Admins can delete users."));
    }
    if principal.user_id == target_id {
        return Err(Denial::SelfDeleteForbidden);
    }
    Ok(())
}

/// What a caller may touch when updating a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserUpdateScope {
    /// tenant_admin of the same tenant or super_admin: may set role/is_active
    Admin,
    /// the user themselves: profile fields only
    SelfOnly,
}

pub fn update_user(principal: &Principal, target_id: Uuid, target_tenant: Uuid) -> Result<UserUpdateScope, Denial> {
    if principal.is_super_admin() {
        return Ok(UserUpdateScope::Admin);
    }
    if principal.is_tenant_admin() && principal.tenant_id == target_tenant {
        return Ok(UserUpdateScope::Admin);
    }
    if principal.user_id == target_id {
        return Ok(UserUpdateScope::SelfOnly);
    }
    Err(forbidden("Access denied. You cannot update this user."))
}

/// A self-scoped update supplying `role` or `is_active` is rejected outright
/// rather than silently dropping the fields.
pub fn check_update_fields(scope: UserUpdateScope, wants_role: bool, wants_is_active: bool) -> Result<(), Denial> {
    if scope == UserUpdateScope::SelfOnly && (wants_role || wants_is_active) {
        return Err(forbidden(
            "Permission denied. You cannot change your own role or active status.",
        ));
    }
    Ok(())
}

pub fn list_users(principal: &Principal, tenant: Uuid) -> Result<(), Denial> {
    if principal.is_super_admin() || principal.tenant_id == tenant {
        return Ok(());
    }
    Err(forbidden("Access denied. You cannot view users of another tenant."))
}

// ---------------------------------------------------------------------------
// Tenants
// ---------------------------------------------------------------------------

pub fn view_tenant(principal: &Principal, tenant: Uuid) -> Result<(), Denial> {
    if principal.is_super_admin() || principal.tenant_id == tenant {
        return Ok(());
    }
    Err(forbidden("Unauthorized access to this tenant"))
}

/// Which tenant fields an update request touches.
#[derive(Debug, Clone, Copy, Default)]
pub struct TenantUpdateFields {
    pub name: bool,
    pub status: bool,
    pub plan: bool,
    pub limits: bool,
}

impl TenantUpdateFields {
    fn privileged(&self) -> bool {
        self.status || self.plan || self.limits
    }
}

/// super_admin may edit any field of any tenant; a tenant_admin may rename
/// their own tenant and nothing else.
pub fn update_tenant(principal: &Principal, tenant: Uuid, fields: &TenantUpdateFields) -> Result<(), Denial> {
    if principal.is_super_admin() {
        return Ok(());
    }
    if principal.tenant_id != tenant {
        return Err(forbidden("Unauthorized access"));
    }
    if !principal.is_tenant_admin() {
        return Err(forbidden("Access denied. Insufficient permissions."));
    }
    if fields.privileged() {
        return Err(forbidden("Permission denied. Only Super Admins can update status or plans."));
    }
    Ok(())
}

pub fn rename_tenant(principal: &Principal) -> Result<(), Denial> {
    if principal.is_tenant_admin() {
        return Ok(());
    }
    Err(forbidden("Access denied. Only Admins can update settings."))
}

/// Deleting the whole organization (cascades to users/projects/tasks/logs).
pub fn delete_tenant(principal: &Principal) -> Result<(), Denial> {
    if principal.is_tenant_admin() {
        return Ok(());
    }
    Err(forbidden("Access denied. Only Admins can delete the organization."))
}

pub fn change_subscription(principal: &Principal) -> Result<(), Denial> {
    if principal.is_tenant_admin() {
        return Ok(());
    }
    Err(forbidden("Access denied. Only Admins can change billing."))
}

pub fn list_tenants(principal: &Principal) -> Result<(), Denial> {
    if principal.is_super_admin() {
        return Ok(());
    }
    Err(forbidden("Access denied. Super Admins only."))
}

pub fn tenant_registry(principal: &Principal) -> Result<(), Denial> {
    if principal.is_super_admin() {
        return Ok(());
    }
    Err(forbidden("Access Denied. System Administrator only."))
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// Mutating a project: must be in the caller's tenant (cross-tenant rows are
/// reported as absent), and then only the creator or a tenant_admin may act.
pub fn modify_project(principal: &Principal, project_tenant: Uuid, created_by: Uuid) -> Result<(), Denial> {
    if project_tenant != principal.tenant_id {
        return Err(Denial::NotFoundMasked("Project not found in your organization".to_string()));
    }
    if principal.user_id == created_by || principal.is_tenant_admin() {
        return Ok(());
    }
    Err(forbidden(
        "Access denied. Only the Project Creator or Tenant Admin can modify this project.",
    ))
}

/// Reaching into a project (creating or listing its tasks). super_admin is
/// unscoped; everyone else must own the project's tenant.
pub fn access_project(principal: &Principal, project_tenant: Uuid) -> Result<(), Denial> {
    if principal.is_super_admin() || project_tenant == principal.tenant_id {
        return Ok(());
    }
    Err(Denial::NotFoundMasked("Project not found in your organization".to_string()))
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Task mutations carry no creator/admin distinction: any member of the
/// owning tenant may act. Deliberately looser than project mutations.
pub fn touch_task(principal: &Principal, task_tenant: Uuid) -> Result<(), Denial> {
    if task_tenant == principal.tenant_id {
        return Ok(());
    }
    Err(Denial::NotFoundMasked("Task not found in your organization".to_string()))
}

/// `assignee_tenant` is the tenant of the user the caller wants to assign,
/// or `None` when no such user exists.
pub fn validate_assignee(assignee_tenant: Option<Uuid>, task_tenant: Uuid) -> Result<(), Denial> {
    match assignee_tenant {
        Some(t) if t == task_tenant => Ok(()),
        _ => Err(Denial::InvalidAssignee),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal { user_id: Uuid::new_v4(), tenant_id: Uuid::new_v4(), role }
    }

    #[test]
    fn add_user_requires_admin_of_target_tenant() {
        let admin = principal(Role::TenantAdmin);
        assert!(add_user(&admin, admin.tenant_id).is_ok());
        assert!(matches!(add_user(&admin, Uuid::new_v4()), Err(Denial::Forbidden(_))));

        let member = principal(Role::User);
        assert!(matches!(add_user(&member, member.tenant_id), Err(Denial::Forbidden(_))));

        let root = principal(Role::SuperAdmin);
        assert!(add_user(&root, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn quota_blocks_at_limit_not_before() {
        assert!(user_quota(SubscriptionPlan::Free, 5, 4).is_ok());
        assert!(matches!(
            user_quota(SubscriptionPlan::Free, 5, 5),
            Err(Denial::LimitReached { limit: 5, current: 5, .. })
        ));
        // over-provisioned tenants stay blocked
        assert!(user_quota(SubscriptionPlan::Free, 5, 9).is_err());
    }

    #[test]
    fn zero_limit_blocks_first_creation() {
        assert!(project_quota(SubscriptionPlan::Free, 0, 0).is_err());
    }

    #[test]
    fn downgrade_blocks_next_creation_without_eviction() {
        // Enterprise tenant with 40 projects downgraded to Free limits (3):
        // the 40 rows stay, but the next creation is refused since 40 >= 3.
        let limits = SubscriptionPlan::Free.limits();
        assert!(matches!(
            project_quota(SubscriptionPlan::Free, limits.max_projects, 40),
            Err(Denial::LimitReached { limit: 3, current: 40, .. })
        ));
    }

    #[test]
    fn delete_user_needs_same_tenant_admin() {
        let admin = principal(Role::TenantAdmin);
        assert!(delete_user(&admin, Uuid::new_v4(), admin.tenant_id).is_ok());
        assert!(delete_user(&admin, Uuid::new_v4(), Uuid::new_v4()).is_err());
        // super_admin holds no delete-user privilege in this system
        let root = principal(Role::SuperAdmin);
        assert!(delete_user(&root, Uuid::new_v4(), root.tenant_id).is_err());
    }

    #[test]
    fn self_delete_guard_fires_for_authorized_admins() {
        let admin = principal(Role::TenantAdmin);
        assert_eq!(
            delete_user(&admin, admin.user_id, admin.tenant_id),
            Err(Denial::SelfDeleteForbidden)
        );
    }

    #[test]
    fn no_last_admin_guard_exists() {
        // Deleting a *different* admin of the same tenant is always allowed,
        // even if that admin is the tenant's last one. Admins are fungible;
        // super_admin can re-provision.
        let admin = principal(Role::TenantAdmin);
        let other_admin = Uuid::new_v4();
        assert!(delete_user(&admin, other_admin, admin.tenant_id).is_ok());
    }

    #[test]
    fn update_user_scopes() {
        let admin = principal(Role::TenantAdmin);
        assert_eq!(update_user(&admin, Uuid::new_v4(), admin.tenant_id), Ok(UserUpdateScope::Admin));

        let member = principal(Role::User);
        assert_eq!(update_user(&member, member.user_id, member.tenant_id), Ok(UserUpdateScope::SelfOnly));
        assert!(update_user(&member, Uuid::new_v4(), member.tenant_id).is_err());

        let root = principal(Role::SuperAdmin);
        assert_eq!(update_user(&root, Uuid::new_v4(), Uuid::new_v4()), Ok(UserUpdateScope::Admin));
    }

    #[test]
    fn self_update_cannot_touch_role_or_active_flag() {
        assert!(check_update_fields(UserUpdateScope::SelfOnly, true, false).is_err());
        assert!(check_update_fields(UserUpdateScope::SelfOnly, false, true).is_err());
        assert!(check_update_fields(UserUpdateScope::SelfOnly, false, false).is_ok());
        assert!(check_update_fields(UserUpdateScope::Admin, true, true).is_ok());
    }

    #[test]
    fn cross_tenant_user_listing_denied_regardless_of_existence() {
        let admin = principal(Role::TenantAdmin);
        // tenant B may or may not exist; the decision is identical
        assert!(matches!(list_users(&admin, Uuid::new_v4()), Err(Denial::Forbidden(_))));
        assert!(list_users(&admin, admin.tenant_id).is_ok());
        assert!(list_users(&principal(Role::SuperAdmin), Uuid::new_v4()).is_ok());
    }

    #[test]
    fn project_mutation_rules() {
        let member = principal(Role::User);
        let creator = member.user_id;

        // creator may modify their own project
        assert!(modify_project(&member, member.tenant_id, creator).is_ok());
        // a different plain member may not
        assert!(matches!(
            modify_project(&member, member.tenant_id, Uuid::new_v4()),
            Err(Denial::Forbidden(_))
        ));
        // tenant_admin may modify anyone's project in their tenant
        let admin = principal(Role::TenantAdmin);
        assert!(modify_project(&admin, admin.tenant_id, Uuid::new_v4()).is_ok());
        // cross-tenant rows are masked as absent, not forbidden
        assert!(matches!(
            modify_project(&admin, Uuid::new_v4(), Uuid::new_v4()),
            Err(Denial::NotFoundMasked(_))
        ));
    }

    #[test]
    fn listing_scope_is_none_only_for_super_admin() {
        let root = principal(Role::SuperAdmin);
        assert_eq!(root.tenant_scope(), None);

        let admin = principal(Role::TenantAdmin);
        assert_eq!(admin.tenant_scope(), Some(admin.tenant_id));

        let member = principal(Role::User);
        assert_eq!(member.tenant_scope(), Some(member.tenant_id));
    }

    #[test]
    fn task_touch_ignores_role_within_tenant() {
        let member = principal(Role::User);
        assert!(touch_task(&member, member.tenant_id).is_ok());
        assert!(matches!(touch_task(&member, Uuid::new_v4()), Err(Denial::NotFoundMasked(_))));
    }

    #[test]
    fn assignee_must_share_the_tenant() {
        let tenant = Uuid::new_v4();
        assert!(validate_assignee(Some(tenant), tenant).is_ok());
        assert_eq!(validate_assignee(Some(Uuid::new_v4()), tenant), Err(Denial::InvalidAssignee));
        assert_eq!(validate_assignee(None, tenant), Err(Denial::InvalidAssignee));
    }

    #[test]
    fn tenant_update_field_partitioning() {
        let name_only = TenantUpdateFields { name: true, ..Default::default() };
        let with_plan = TenantUpdateFields { name: true, plan: true, ..Default::default() };

        let admin = principal(Role::TenantAdmin);
        assert!(update_tenant(&admin, admin.tenant_id, &name_only).is_ok());
        assert!(update_tenant(&admin, admin.tenant_id, &with_plan).is_err());
        assert!(update_tenant(&admin, Uuid::new_v4(), &name_only).is_err());

        let member = principal(Role::User);
        assert!(update_tenant(&member, member.tenant_id, &name_only).is_err());

        let root = principal(Role::SuperAdmin);
        assert!(update_tenant(&root, Uuid::new_v4(), &with_plan).is_ok());
    }

    #[test]
    fn settings_and_billing_are_admin_only() {
        let member = principal(Role::User);
        assert!(rename_tenant(&member).is_err());
        assert!(delete_tenant(&member).is_err());
        assert!(change_subscription(&member).is_err());

        let admin = principal(Role::TenantAdmin);
        assert!(rename_tenant(&admin).is_ok());
        assert!(delete_tenant(&admin).is_ok());
        assert!(change_subscription(&admin).is_ok());
    }

    #[test]
    fn global_listings_are_super_admin_only() {
        assert!(list_tenants(&principal(Role::TenantAdmin)).is_err());
        assert!(list_tenants(&principal(Role::SuperAdmin)).is_ok());
        assert!(tenant_registry(&principal(Role::User)).is_err());
        assert!(tenant_registry(&principal(Role::SuperAdmin)).is_ok());
    }
}
