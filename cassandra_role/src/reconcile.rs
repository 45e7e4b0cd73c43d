//! Pure diffing of desired vs current state.
//!
//! Each reconciler takes a snapshot of current state by value and returns
//! the statements needed to converge; none of them performs I/O.

pub mod attributes;
pub mod membership;
pub mod permissions;

use std::collections::BTreeSet;

use serde::Serialize;

/// Revoke and grant statements for one reconciler. Revokes are always
/// applied first.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StatementPlan {
    /// Statements removing access.
    pub to_revoke: BTreeSet<String>,
    /// Statements adding access.
    pub to_grant: BTreeSet<String>,
}

impl StatementPlan {
    /// No statements in either set.
    pub fn is_empty(&self) -> bool {
        self.to_revoke.is_empty() && self.to_grant.is_empty()
    }

    /// Statements in application order: every revoke, then every grant.
    pub fn ordered(&self) -> impl Iterator<Item = &String> {
        self.to_revoke.iter().chain(self.to_grant.iter())
    }
}

/// Elements only in `desired`, and elements only in `current`.
pub(crate) fn diff_sets<'a, T: Ord + 'a>(
    desired: &'a BTreeSet<T>,
    current: &'a BTreeSet<T>,
) -> (
    impl Iterator<Item = &'a T> + 'a,
    impl Iterator<Item = &'a T> + 'a,
) {
    (desired.difference(current), current.difference(desired))
}
