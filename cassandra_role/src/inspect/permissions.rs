use crate::{
    entry_types::{GrantRow, RoleName},
    error::ReconcileError,
    logging::warn,
    permissions::Scope,
    session::ReadSession,
};

use super::list_permission_rows;

/// Queries the keyspace-level grants visible for a role.
pub struct PermissionInspector<'a, R: ReadSession + ?Sized> {
    session: &'a R,
}

impl<'a, R: ReadSession + ?Sized> PermissionInspector<'a, R> {
    /// Wrap a read session.
    pub fn new(session: &'a R) -> Self {
        Self { session }
    }

    /// Fetch a fresh snapshot of keyspace-level grants, including those
    /// inherited through memberships.
    ///
    /// Rows on other resources are dropped. Keyspace rows with a permission
    /// outside the catalog are dropped with a warning.
    pub async fn fetch_grants(&self, role: &RoleName) -> Result<Vec<GrantRow>, ReconcileError> {
        let rows = list_permission_rows(self.session, role).await?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let grant = row.to_grant();
                if grant.is_none() && Scope::from_resource(&row.resource).is_some() {
                    warn!(
                        "ignoring unknown permission {} on {} for {}",
                        row.permission, row.resource, row.role
                    );
                }
                grant
            })
            .collect())
    }
}
