//! Role membership reconciliation.

use std::collections::BTreeSet;

use crate::{cql, entry_types::RoleName};

use super::{diff_sets, StatementPlan};

/// Compute membership grants and revokes.
///
/// `desired` of `None` leaves memberships untouched; an empty set detaches
/// the role from everything it is currently a member of.
pub fn reconcile(
    current: &BTreeSet<RoleName>,
    desired: Option<&BTreeSet<RoleName>>,
    role: &RoleName,
) -> StatementPlan {
    let Some(desired) = desired else {
        return StatementPlan::default();
    };

    let (add, remove) = diff_sets(desired, current);
    StatementPlan {
        to_revoke: remove.map(|r| cql::revoke_role(r, role)).collect(),
        to_grant: add.map(|r| cql::grant_role(r, role)).collect(),
    }
}
