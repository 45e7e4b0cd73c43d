use serde::Serialize;

use crate::{
    error::ReconcileError,
    session::{Columns, FromRow, Row},
};

use super::{GrantRow, RoleName};

/// A raw row of `LIST ALL OF '<role>'`.
///
/// `role` is the role actually holding the permission (the listed role
/// itself or one it inherits from); `username` is the listed role.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct PermissionRow {
    /// Role the permission is granted on.
    pub role: RoleName,
    /// Role the listing was requested for.
    pub username: RoleName,
    /// The resource, e.g. `<keyspace ks1>`.
    pub resource: String,
    /// The permission name, e.g. `SELECT`.
    pub permission: String,
}

impl FromRow for PermissionRow {
    const SOURCE: &'static str = "LIST ALL";

    fn from_row(row: &Row) -> Result<Self, ReconcileError> {
        let cols = Columns::new(row, Self::SOURCE);
        Ok(PermissionRow {
            role: RoleName(cols.text("role")?.trim().to_owned()),
            username: RoleName(cols.text("username")?.trim().to_owned()),
            resource: cols.text("resource")?.trim().to_owned(),
            permission: cols.text("permission")?.trim().to_owned(),
        })
    }
}

impl PermissionRow {
    /// Interpret the row as a keyspace-level grant. Rows on other
    /// resources, or with permissions outside the catalog, yield `None`.
    pub fn to_grant(&self) -> Option<GrantRow> {
        let scope = crate::permissions::Scope::from_resource(&self.resource)?;
        let kind = self.permission.parse().ok()?;
        Some(GrantRow {
            granted_on_role: self.role.to_owned(),
            grantee: self.username.to_owned(),
            scope,
            kind,
        })
    }
}
