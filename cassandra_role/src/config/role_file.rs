//! Desired-state files.
//!
//! ```yaml
//! name: rhys
//! state: present
//! login: true
//! password: secret
//! update_password: true
//! data_centres: [london, zurich]
//! keyspace_permissions:
//!   mykeyspace: ["ALL PERMISSIONS"]
//!   all_keyspaces: [SELECT]
//! roles: [reader]
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{
    desired::{DesiredRoleSpec, RoleState},
    entry_types::RoleName,
    permissions::RawPermissions,
};

/// A role file as written by the user.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RoleFile {
    /// Role name.
    pub name: String,
    /// `present` or `absent`.
    pub state: RoleState,
    /// Superuser flag.
    #[serde(default)]
    pub super_user: bool,
    /// Login flag. Roles that can't log in are managed as plain roles.
    #[serde(default = "default_login")]
    pub login: bool,
    /// Password, passed through unhashed.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Always rewrite the password.
    #[serde(default)]
    pub update_password: bool,
    /// Authenticator options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, String>>,
    /// Datacentres the role may use.
    #[serde(default, alias = "data_centers", skip_serializing_if = "Option::is_none")]
    pub data_centres: Option<IndexSet<String>>,
    /// Keyspace (or `all_keyspaces`) -> permission names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyspace_permissions: Option<RawPermissions>,
    /// Roles to be a member of. Leave unset to not manage memberships.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

fn default_login() -> bool {
    true
}

impl RoleFile {
    /// Parse the first document of a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut docs: Vec<RoleFile> =
            yaml_peg::serde::from_str(yaml).context("Deserializing role file")?;
        if docs.is_empty() {
            bail!("unable to parse role file: no document found")
        }
        Ok(docs.swap_remove(0))
    }

    /// Read and parse a role file.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Reading {}", path.as_ref().display()))?;
        Self::from_yaml(&raw)
    }

    /// Convert into the desired state used for reconciliation.
    pub fn into_desired(self) -> DesiredRoleSpec {
        DesiredRoleSpec {
            name: RoleName(self.name),
            state: self.state,
            can_login: self.login,
            is_superuser: self.super_user,
            password: self.password,
            force_password_update: self.update_password,
            options: self.options,
            data_centres: self.data_centres,
            permissions: self.keyspace_permissions,
            roles: self
                .roles
                .map(|roles| roles.into_iter().map(RoleName).collect()),
        }
    }
}
