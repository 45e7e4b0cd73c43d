use serde::Serialize;

use crate::permissions::{PermissionKind, Scope};

use super::RoleName;

/// A keyspace-level permission held by a role, as read from the store.
#[derive(Clone, Serialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GrantRow {
    /// The role the permission is granted on.
    pub granted_on_role: RoleName,
    /// The role the listing was requested for.
    pub grantee: RoleName,
    /// Where the permission applies.
    pub scope: Scope,
    /// Which permission. Always atomic when read back.
    pub kind: PermissionKind,
}

impl GrantRow {
    /// Convenience constructor for a permission held directly by `role`.
    pub fn direct(role: &str, scope: Scope, kind: PermissionKind) -> Self {
        Self {
            granted_on_role: RoleName::from(role),
            grantee: RoleName::from(role),
            scope,
            kind,
        }
    }

    /// Whether the permission is held by `role` itself rather than
    /// inherited from another role.
    pub fn is_held_by(&self, role: &RoleName) -> bool {
        &self.granted_on_role == role
    }
}
