//! The caller-supplied target state for one role.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{entry_types::RoleName, permissions::RawPermissions};

/// Whether the role should exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleState {
    /// The role should exist.
    Present,
    /// The role should not exist.
    Absent,
}

/// Desired state of a role. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredRoleSpec {
    /// Role name.
    pub name: RoleName,
    /// Whether the role should exist.
    pub state: RoleState,
    /// Whether the role may log in. Non-login roles follow a reduced
    /// create/drop state machine.
    pub can_login: bool,
    /// Whether the role is a superuser.
    pub is_superuser: bool,
    /// Password passed through to the store as-is.
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Always (re)write the password, marking the run changed.
    pub force_password_update: bool,
    /// Authenticator-specific options.
    pub options: Option<BTreeMap<String, String>>,
    /// Datacentres the role may connect through. A single `ALL` entry
    /// grants access to every datacentre.
    pub data_centres: Option<IndexSet<String>>,
    /// Keyspace key -> permission names, validated at the start of a run.
    /// `None` leaves all-keyspaces grants alone and revokes per-keyspace ones.
    pub permissions: Option<RawPermissions>,
    /// Roles to be a member of. `None` leaves memberships untouched; an
    /// empty set revokes every membership.
    pub roles: Option<BTreeSet<RoleName>>,
}

impl DesiredRoleSpec {
    /// A login-capable, non-superuser role with nothing else specified.
    pub fn new(name: &str, state: RoleState) -> Self {
        Self {
            name: RoleName::from(name),
            state,
            can_login: true,
            is_superuser: false,
            password: None,
            force_password_update: false,
            options: None,
            data_centres: None,
            permissions: None,
            roles: None,
        }
    }

    /// Set the login flag.
    pub fn with_login(mut self, can_login: bool) -> Self {
        self.can_login = can_login;
        self
    }

    /// Set the superuser flag.
    pub fn with_superuser(mut self, is_superuser: bool) -> Self {
        self.is_superuser = is_superuser;
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_owned());
        self
    }

    /// Set the datacentres.
    pub fn with_data_centres<I, S>(mut self, dcs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_centres = Some(dcs.into_iter().map(Into::into).collect());
        self
    }

    /// Set the desired permissions for one keyspace key (`all_keyspaces`
    /// for every keyspace).
    pub fn with_permissions(mut self, keyspace: &str, permissions: &[&str]) -> Self {
        self.permissions.get_or_insert_with(Default::default).insert(
            keyspace.to_owned(),
            permissions.iter().map(|p| (*p).to_owned()).collect(),
        );
        self
    }

    /// Set the desired memberships.
    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.roles = Some(roles.iter().map(|r| RoleName::from(*r)).collect());
        self
    }
}
