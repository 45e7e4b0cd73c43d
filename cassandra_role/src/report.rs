//! The outcome of a reconciliation run.

use std::{collections::BTreeSet, fmt::Display};

use colored::Colorize;
use serde::{Serialize, Serializer};

use crate::{entry_types::RoleName, error::ReconcileError, reconcile::attributes::RoleAction};

/// Extra detail reported at `Debug` verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Whether the role existed before the run.
    pub role_existed: bool,
    /// Whether the role attributes needed a create, alter or drop.
    pub role_changed: bool,
}

/// What a run did (or, in dry-run mode, would do).
///
/// All statements are redacted: password literals never appear here.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    /// The role operated on.
    pub role: RoleName,
    /// Whether anything changed, or would change in a dry run.
    pub changed: bool,
    /// Whether statements were withheld from the store.
    pub dry_run: bool,
    /// The create, alter or drop decided for the role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_action: Option<RoleAction>,
    /// The statement for `role_action`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_statement: Option<String>,
    /// Statements that reached the store, in order. Empty in a dry run.
    pub applied_statements: Vec<String>,
    /// Permission grants planned.
    pub granted_permissions: BTreeSet<String>,
    /// Permission revokes planned.
    pub revoked_permissions: BTreeSet<String>,
    /// Membership grants planned.
    pub granted_roles: BTreeSet<String>,
    /// Membership revokes planned.
    pub revoked_roles: BTreeSet<String>,
    /// Present at `Debug` verbosity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
    /// The error that aborted the run, if any. Statements listed in
    /// `applied_statements` stay applied.
    #[serde(
        serialize_with = "serialize_error",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<ReconcileError>,
}

fn serialize_error<S>(error: &Option<ReconcileError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match error {
        Some(e) => serializer.serialize_str(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

impl RunReport {
    /// A fresh report for `role`.
    pub fn new(role: RoleName, dry_run: bool) -> Self {
        Self {
            role,
            dry_run,
            ..Default::default()
        }
    }

    /// Whether the run finished without error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Pretty JSON for callers that consume the report programmatically.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut text = format!("role: {}", self.role);
        if self.dry_run {
            text += " (dry run)";
        }
        text += "\n";

        if let (Some(action), Some(statement)) = (&self.role_action, &self.role_statement) {
            let line = match action {
                RoleAction::Create => format!("  + {statement}\n").green(),
                RoleAction::Alter => format!("  ~ {statement}\n").yellow(),
                RoleAction::Drop => format!("  - {statement}\n").red(),
            };
            text += &line.to_string();
        }

        for (title, revoked, granted) in [
            (
                "permissions",
                &self.revoked_permissions,
                &self.granted_permissions,
            ),
            ("roles", &self.revoked_roles, &self.granted_roles),
        ] {
            if revoked.is_empty() && granted.is_empty() {
                continue;
            }
            text += &format!("  {title}:\n");
            for s in revoked {
                text += &format!("    - {s}\n").red().to_string();
            }
            for s in granted {
                text += &format!("    + {s}\n").green().to_string();
            }
        }

        if !self.changed {
            text += "  No changes\n";
        }
        if let Some(e) = &self.error {
            text += &format!("  error: {e}\n").red().to_string();
        }
        write!(f, "{text}")
    }
}
