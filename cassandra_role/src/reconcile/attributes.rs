//! Role attribute reconciliation: CREATE, ALTER or DROP.

use std::fmt::Display;

use serde::Serialize;

use crate::{
    cql,
    desired::{DesiredRoleSpec, RoleState},
    entry_types::Role,
};

/// What happens to the role itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleAction {
    /// The role is created.
    Create,
    /// An existing role's attributes are rewritten.
    Alter,
    /// The role is dropped.
    Drop,
}

impl Display for RoleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleAction::Create => write!(f, "create"),
            RoleAction::Alter => write!(f, "alter"),
            RoleAction::Drop => write!(f, "drop"),
        }
    }
}

/// A decided change to the role and the statement implementing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDecision {
    /// The kind of change.
    pub action: RoleAction,
    /// The statement to execute. May contain a password literal.
    pub statement: String,
    /// `statement` with any password literal masked.
    pub redacted: String,
}

/// Whether an existing login role needs an ALTER.
///
/// Password, options and datacentres can't be read back and are not
/// compared; `force_password_update` forces a rewrite.
pub fn is_role_changed(current: &Role, desired: &DesiredRoleSpec) -> bool {
    current.is_superuser != desired.is_superuser
        || current.can_login != desired.can_login
        || desired.force_password_update
}

/// Decide what, if anything, to do with the role.
///
/// Login roles are created or altered with their full attribute set.
/// Non-login roles are only ever created bare or dropped.
pub fn reconcile(desired: &DesiredRoleSpec, current: Option<&Role>) -> Option<RoleDecision> {
    let plain = |action, statement: String| {
        Some(RoleDecision {
            action,
            redacted: statement.clone(),
            statement,
        })
    };
    let with_attributes = |action, alter| {
        Some(RoleDecision {
            action,
            statement: cql::create_or_alter_role(desired, alter),
            redacted: cql::create_or_alter_role_redacted(desired, alter),
        })
    };

    match (desired.state, current) {
        (RoleState::Absent, None) => None,
        (RoleState::Absent, Some(_)) => plain(RoleAction::Drop, cql::drop_role(&desired.name)),
        (RoleState::Present, None) if desired.can_login => {
            with_attributes(RoleAction::Create, false)
        }
        (RoleState::Present, None) => plain(RoleAction::Create, cql::create_role(&desired.name)),
        (RoleState::Present, Some(current)) => {
            if desired.can_login && is_role_changed(current, desired) {
                with_attributes(RoleAction::Alter, true)
            } else {
                None
            }
        }
    }
}
