//! CQL statement construction.
//!
//! Every statement the crate reads or writes is built here so the exact
//! text is defined in one place.

use std::collections::BTreeMap;

use indexmap::IndexSet;

use crate::{
    desired::DesiredRoleSpec,
    entry_types::RoleName,
    permissions::{PermissionKind, Scope},
};

const REDACTED: &str = "********";

/// Quote a string literal, doubling embedded single quotes.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Does the role exist?
pub fn select_role(role: &RoleName) -> String {
    format!(
        "SELECT role FROM system_auth.roles WHERE role = {}",
        quote(&role.0)
    )
}

/// Fetch the attributes of a role.
pub fn select_role_attributes(role: &RoleName) -> String {
    format!(
        "SELECT role, can_login, is_superuser, member_of, salted_hash FROM system_auth.roles WHERE role = {}",
        quote(&role.0)
    )
}

/// List every permission the role holds, directly or inherited.
pub fn list_all_of(role: &RoleName) -> String {
    format!("LIST ALL OF {}", quote(&role.0))
}

/// `CREATE ROLE` (or `ALTER ROLE` when `alter` is set) carrying the full
/// attribute set of a login role.
pub fn create_or_alter_role(desired: &DesiredRoleSpec, alter: bool) -> String {
    role_with_attributes(desired, alter, desired.password.as_deref())
}

/// [`create_or_alter_role`] with the password literal masked, for logs and
/// reports.
pub fn create_or_alter_role_redacted(desired: &DesiredRoleSpec, alter: bool) -> String {
    role_with_attributes(desired, alter, desired.password.as_ref().map(|_| REDACTED))
}

fn role_with_attributes(desired: &DesiredRoleSpec, alter: bool, password: Option<&str>) -> String {
    let verb = if alter { "ALTER" } else { "CREATE" };
    let mut clauses = vec![
        format!("SUPERUSER = {}", desired.is_superuser),
        format!("LOGIN = {}", desired.can_login),
    ];
    if let Some(password) = password {
        clauses.push(format!("PASSWORD = {}", quote(password)));
    }
    if let Some(options) = &desired.options {
        clauses.push(format!("OPTIONS = {}", options_literal(options)));
    }
    if let Some(clause) = desired.data_centres.as_ref().and_then(data_centre_clause) {
        clauses.push(clause);
    }
    format!(
        "{verb} ROLE {} WITH {}",
        quote(&desired.name.0),
        clauses.join(" AND ")
    )
}

/// `CREATE ROLE` with no attributes, for non-login roles.
pub fn create_role(role: &RoleName) -> String {
    format!("CREATE ROLE {}", quote(&role.0))
}

/// `DROP ROLE`.
pub fn drop_role(role: &RoleName) -> String {
    format!("DROP ROLE {}", quote(&role.0))
}

/// The datacentre access clause.
///
/// A lone `ALL` (any case) means every datacentre; otherwise the whole set
/// is listed. An empty set produces no clause.
pub fn data_centre_clause(dcs: &IndexSet<String>) -> Option<String> {
    match dcs.len() {
        0 => None,
        1 if dcs.iter().all(|dc| dc.eq_ignore_ascii_case("ALL")) => {
            Some("ACCESS TO ALL DATACENTERS".to_owned())
        }
        _ => Some(format!(
            "ACCESS TO DATACENTERS {{{}}}",
            dcs.iter().map(|dc| quote(dc)).collect::<Vec<_>>().join(",")
        )),
    }
}

fn options_literal(options: &BTreeMap<String, String>) -> String {
    format!(
        "{{{}}}",
        options
            .iter()
            .map(|(k, v)| format!("{}: {}", quote(k), quote(v)))
            .collect::<Vec<_>>()
            .join(", ")
    )
}

/// Grant a permission on a scope.
pub fn grant_permission(kind: PermissionKind, scope: &Scope, role: &RoleName) -> String {
    format!("GRANT {kind} ON {scope} TO {}", quote(&role.0))
}

/// Revoke a permission on a scope.
pub fn revoke_permission(kind: PermissionKind, scope: &Scope, role: &RoleName) -> String {
    format!("REVOKE {kind} ON {scope} FROM {}", quote(&role.0))
}

/// Revoke everything granted on all keyspaces.
pub fn revoke_all_on_all_keyspaces(role: &RoleName) -> String {
    revoke_permission(PermissionKind::AllPermissions, &Scope::AllKeyspaces, role)
}

/// Make `role` a member of `member_of`.
pub fn grant_role(member_of: &RoleName, role: &RoleName) -> String {
    format!("GRANT {} TO {}", quote(&member_of.0), quote(&role.0))
}

/// Remove `role` from `member_of`.
pub fn revoke_role(member_of: &RoleName, role: &RoleName) -> String {
    format!("REVOKE {} FROM {}", quote(&member_of.0), quote(&role.0))
}
