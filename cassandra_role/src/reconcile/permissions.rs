//! Keyspace-level permission reconciliation.

use crate::{
    cql,
    entry_types::{GrantRow, RoleName},
    permissions::{PermissionKind, PermissionMap, Scope},
};

use super::StatementPlan;

/// Whether `role` already holds `kind` on `scope`.
///
/// `ALL PERMISSIONS` is satisfied only when every atomic kind is held,
/// since the store lists it expanded. Only permissions held directly by
/// the role count.
pub fn is_satisfied(
    current: &[GrantRow],
    kind: PermissionKind,
    scope: &Scope,
    role: &RoleName,
) -> bool {
    let held = |k: PermissionKind| {
        current
            .iter()
            .any(|g| g.is_held_by(role) && &g.scope == scope && g.kind == k)
    };

    if kind.is_composite() {
        PermissionKind::ATOMIC.into_iter().all(held)
    } else {
        held(kind)
    }
}

/// Compute the grants and revokes converging `current` onto `desired`.
///
/// With `desired` absent nothing is granted and every per-keyspace
/// permission the role holds is revoked; all-keyspaces grants are left
/// alone.
pub fn reconcile(
    current: &[GrantRow],
    desired: Option<&PermissionMap>,
    role: &RoleName,
) -> StatementPlan {
    let mut plan = StatementPlan::default();

    if let Some(desired) = desired {
        for (scope, kinds) in desired {
            for kind in kinds {
                if !is_satisfied(current, *kind, scope, role) {
                    plan.to_grant
                        .insert(cql::grant_permission(*kind, scope, role));
                }
            }
        }
    }

    for grant in current.iter().filter(|g| g.is_held_by(role)) {
        if let Some(statement) = revoke_for(grant, desired, role) {
            plan.to_revoke.insert(statement);
        }
    }

    plan
}

/// The revoke, if any, needed for one currently-held grant.
fn revoke_for(
    grant: &GrantRow,
    desired: Option<&PermissionMap>,
    role: &RoleName,
) -> Option<String> {
    let revoke_kind = || Some(cql::revoke_permission(grant.kind, &grant.scope, role));

    match (&grant.scope, desired) {
        (Scope::AllKeyspaces, None) => None,
        (Scope::AllKeyspaces, Some(desired)) => match desired.get(&Scope::AllKeyspaces) {
            // a single aggregate revoke; the plan's set semantics collapse
            // repeats from the other kinds
            None => Some(cql::revoke_all_on_all_keyspaces(role)),
            // all-keyspaces grants are never revoked kind by kind
            Some(_) => None,
        },
        (Scope::Keyspace(_), None) => revoke_kind(),
        (Scope::Keyspace(_), Some(desired)) => match desired.get(&grant.scope) {
            None => revoke_kind(),
            Some(kinds)
                if !kinds.contains(&grant.kind)
                    && !kinds.contains(&PermissionKind::AllPermissions) =>
            {
                revoke_kind()
            }
            Some(_) => None,
        },
    }
}
