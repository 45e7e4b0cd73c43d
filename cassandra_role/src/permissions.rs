//! The permission catalog: which permission kinds exist at keyspace level,
//! how `ALL PERMISSIONS` expands, and the scopes they apply to.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;

/// Config key selecting the all-keyspaces scope.
pub const ALL_KEYSPACES_KEY: &str = "all_keyspaces";
const ALL_KEYSPACES_RESOURCE: &str = "<all keyspaces>";
const KEYSPACE_RESOURCE_PREFIX: &str = "<keyspace ";

/// A keyspace-level permission. Serialized under its catalog name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionKind {
    /// Composite of every atomic kind. Never read back as a single row.
    #[serde(rename = "ALL PERMISSIONS")]
    AllPermissions,
    /// CREATE
    Create,
    /// ALTER
    Alter,
    /// AUTHORIZE
    Authorize,
    /// DROP
    Drop,
    /// MODIFY
    Modify,
    /// SELECT
    Select,
}

impl PermissionKind {
    /// The kinds `ALL PERMISSIONS` expands to when listed back from the store.
    pub const ATOMIC: [PermissionKind; 6] = [
        PermissionKind::Create,
        PermissionKind::Alter,
        PermissionKind::Authorize,
        PermissionKind::Drop,
        PermissionKind::Modify,
        PermissionKind::Select,
    ];

    /// The name used in CQL and in configuration.
    pub fn cql_name(&self) -> &'static str {
        match self {
            PermissionKind::AllPermissions => "ALL PERMISSIONS",
            PermissionKind::Create => "CREATE",
            PermissionKind::Alter => "ALTER",
            PermissionKind::Authorize => "AUTHORIZE",
            PermissionKind::Drop => "DROP",
            PermissionKind::Modify => "MODIFY",
            PermissionKind::Select => "SELECT",
        }
    }

    /// Whether this kind stands for several atomic kinds.
    pub fn is_composite(&self) -> bool {
        matches!(self, PermissionKind::AllPermissions)
    }
}

impl Display for PermissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cql_name())
    }
}

impl FromStr for PermissionKind {
    type Err = String;

    /// Names must match the catalog exactly (surrounding whitespace aside,
    /// since the store pads its listing columns).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ALL PERMISSIONS" => Ok(PermissionKind::AllPermissions),
            "CREATE" => Ok(PermissionKind::Create),
            "ALTER" => Ok(PermissionKind::Alter),
            "AUTHORIZE" => Ok(PermissionKind::Authorize),
            "DROP" => Ok(PermissionKind::Drop),
            "MODIFY" => Ok(PermissionKind::Modify),
            "SELECT" => Ok(PermissionKind::Select),
            other => Err(other.to_owned()),
        }
    }
}

/// The resource a permission applies to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Scope {
    /// Every keyspace, current and future.
    AllKeyspaces,
    /// One named keyspace.
    Keyspace(String),
}

impl Scope {
    /// Map a `keyspace_permissions` key onto a scope.
    pub fn from_config_key(key: &str) -> Self {
        if key == ALL_KEYSPACES_KEY {
            Scope::AllKeyspaces
        } else {
            Scope::Keyspace(key.to_owned())
        }
    }

    /// Parse the `resource` column of a `LIST ALL` row. Resources that are
    /// not keyspace-level (tables, roles, functions) yield `None`.
    pub fn from_resource(resource: &str) -> Option<Self> {
        let resource = resource.trim();
        if resource == ALL_KEYSPACES_RESOURCE {
            return Some(Scope::AllKeyspaces);
        }
        resource
            .strip_prefix(KEYSPACE_RESOURCE_PREFIX)
            .and_then(|r| r.strip_suffix('>'))
            .map(|ks| Scope::Keyspace(ks.trim().to_owned()))
    }

    /// The resource string the store lists for this scope.
    pub fn resource(&self) -> String {
        match self {
            Scope::AllKeyspaces => ALL_KEYSPACES_RESOURCE.to_owned(),
            Scope::Keyspace(ks) => format!("{KEYSPACE_RESOURCE_PREFIX}{ks}>"),
        }
    }
}

impl Display for Scope {
    /// The `ON ...` target of a GRANT or REVOKE.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::AllKeyspaces => write!(f, "ALL KEYSPACES"),
            Scope::Keyspace(ks) => write!(f, "KEYSPACE {ks}"),
        }
    }
}

/// Permissions as supplied by the caller: keyspace key -> permission names.
pub type RawPermissions = BTreeMap<String, Vec<String>>;

/// Validated desired permissions.
pub type PermissionMap = BTreeMap<Scope, BTreeSet<PermissionKind>>;

/// Check every supplied permission name against the catalog.
///
/// All unknown names are collected so the caller sees them at once.
pub fn validate(raw: &RawPermissions) -> Result<PermissionMap, ReconcileError> {
    let mut invalid = Vec::new();
    let mut res = PermissionMap::new();

    for (key, names) in raw {
        let kinds = res.entry(Scope::from_config_key(key)).or_default();
        for name in names {
            match name.parse::<PermissionKind>() {
                Ok(kind) => {
                    kinds.insert(kind);
                }
                Err(bad) => invalid.push(format!("{bad} (on {key})")),
            }
        }
    }

    if invalid.is_empty() {
        Ok(res)
    } else {
        Err(ReconcileError::Validation(invalid))
    }
}
