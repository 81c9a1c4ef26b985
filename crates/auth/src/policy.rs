use crate::{AuthError, ClaimSet, Role, require_role};

/// Protected operations exposed by the HTTP surface.
///
/// The mapping below is the role-policy table: every protected route names its
/// action and the gate resolves the required role set from one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectedAction {
    AssetRead,
    AssetCreate,
    AssetMutate,
    CategoryRead,
    CategoryMutate,
    DepartmentRead,
    DepartmentMutate,
    UserAdmin,
    DashboardStats,
    ProfileRead,
}

const ANY_AUTHENTICATED: &[Role] = &[Role::Admin, Role::User];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Role set required for an action.
///
/// Defaults: mutate/delete anywhere and user administration are admin-only;
/// creating/reading own assets and the global lookup lists are open to any
/// authenticated role.
pub fn allowed_roles(action: ProtectedAction) -> &'static [Role] {
    match action {
        ProtectedAction::AssetRead
        | ProtectedAction::AssetCreate
        | ProtectedAction::CategoryRead
        | ProtectedAction::DepartmentRead
        | ProtectedAction::ProfileRead => ANY_AUTHENTICATED,

        ProtectedAction::AssetMutate
        | ProtectedAction::CategoryMutate
        | ProtectedAction::DepartmentMutate
        | ProtectedAction::UserAdmin
        | ProtectedAction::DashboardStats => ADMIN_ONLY,
    }
}

/// Check one action against the policy table.
pub fn require(claims: &ClaimSet, action: ProtectedAction) -> Result<(), AuthError> {
    require_role(claims, allowed_roles(action))
}
