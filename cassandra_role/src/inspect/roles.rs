use std::collections::BTreeSet;

use crate::{
    cql,
    entry_types::{PermissionRow, Role, RoleName},
    error::ReconcileError,
    session::{FromRow, ReadSession},
};

use super::list_permission_rows;

/// Queries role existence, attributes and memberships.
pub struct RoleInspector<'a, R: ReadSession + ?Sized> {
    session: &'a R,
}

impl<'a, R: ReadSession + ?Sized> RoleInspector<'a, R> {
    /// Wrap a read session.
    pub fn new(session: &'a R) -> Self {
        Self { session }
    }

    /// True iff a row for the role exists in `system_auth.roles`.
    pub async fn exists(&self, role: &RoleName) -> Result<bool, ReconcileError> {
        let statement = cql::select_role(role);
        let rows = self
            .session
            .execute_read(&statement)
            .await
            .map_err(|e| ReconcileError::store(statement, e))?;
        Ok(!rows.is_empty())
    }

    /// Fetch the role's attributes, failing with `NotFound` if it does not
    /// exist.
    pub async fn fetch_attributes(&self, role: &RoleName) -> Result<Role, ReconcileError> {
        let statement = cql::select_role_attributes(role);
        let rows = self
            .session
            .execute_read(&statement)
            .await
            .map_err(|e| ReconcileError::store(statement, e))?;
        match rows.first() {
            Some(row) => Role::from_row(row),
            None => Err(ReconcileError::NotFound(role.to_string())),
        }
    }

    /// Like [`Self::fetch_attributes`], with a missing role read as `None`.
    pub async fn fetch_current(&self, role: &RoleName) -> Result<Option<Role>, ReconcileError> {
        match self.fetch_attributes(role).await {
            Ok(r) => Ok(Some(r)),
            Err(ReconcileError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The roles this role is directly a member of.
    ///
    /// `LIST ALL` names every role up the inheritance chain, so once the
    /// role exists its `member_of` attribute decides which holders are
    /// direct. Rows alone are used only when the attribute row is missing.
    pub async fn fetch_memberships(
        &self,
        role: &RoleName,
    ) -> Result<BTreeSet<RoleName>, ReconcileError> {
        let rows = list_permission_rows(self.session, role).await?;
        let current = self.fetch_current(role).await?;
        Ok(direct_memberships(
            &rows,
            role,
            current.as_ref().map(|c| &c.member_of),
        ))
    }
}

/// Holders of permissions listed for `role`, other than `role` itself.
pub(crate) fn memberships_from_rows(
    rows: &[PermissionRow],
    role: &RoleName,
) -> BTreeSet<RoleName> {
    rows.iter()
        .filter(|r| &r.username == role && &r.role != role)
        .map(|r| r.role.to_owned())
        .collect()
}

/// Direct memberships of `role`.
///
/// A `member_of` attribute is authoritative: every transitive holder in
/// the rows is also reachable through it, and it covers memberships of
/// roles holding no permissions. Without one, the row-derived holders are
/// used.
pub(crate) fn direct_memberships(
    rows: &[PermissionRow],
    role: &RoleName,
    member_of: Option<&BTreeSet<RoleName>>,
) -> BTreeSet<RoleName> {
    match member_of {
        Some(direct) => direct.to_owned(),
        None => memberships_from_rows(rows, role),
    }
}
