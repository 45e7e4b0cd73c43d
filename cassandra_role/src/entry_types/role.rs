use std::{collections::BTreeSet, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::{
    error::ReconcileError,
    session::{Columns, FromRow, Row},
};

/// Wrapper struct for role names.
///
/// Names are unique and case-sensitive within a cluster.
#[derive(Clone, Default, Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RoleName(pub String);

impl Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoleName {
    fn from(s: &str) -> Self {
        RoleName(s.to_owned())
    }
}

/// A row of `system_auth.roles`.
#[derive(Clone, Default, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Role {
    /// The role name.
    pub name: RoleName,
    /// Whether the role may log in.
    pub can_login: bool,
    /// Whether the role is a superuser.
    pub is_superuser: bool,
    /// Roles this role inherits from.
    pub member_of: BTreeSet<RoleName>,
    /// Opaque password hash. Never compared.
    #[serde(skip_serializing)]
    pub salted_hash: Option<String>,
}

impl FromRow for Role {
    const SOURCE: &'static str = "system_auth.roles";

    fn from_row(row: &Row) -> Result<Self, ReconcileError> {
        let cols = Columns::new(row, Self::SOURCE);
        Ok(Role {
            name: RoleName(cols.text("role")?),
            can_login: cols.boolean("can_login")?,
            is_superuser: cols.boolean("is_superuser")?,
            member_of: cols.set("member_of")?.into_iter().map(RoleName).collect(),
            salted_hash: cols.optional_text("salted_hash")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use maplit::{btreemap, btreeset};

    use super::*;
    use crate::session::CqlValue;

    #[test]
    fn role_from_row_works() -> Result<()> {
        let row = btreemap! {
            "role".to_owned() => CqlValue::Text("rhys".to_owned()),
            "can_login".to_owned() => CqlValue::Boolean(true),
            "is_superuser".to_owned() => CqlValue::Null,
            "member_of".to_owned() => CqlValue::Set(btreeset! {"reader".to_owned()}),
            "salted_hash".to_owned() => CqlValue::Text("$2a$10$abc".to_owned()),
        };
        let role = Role::from_row(&row)?;
        assert_eq!(role.name, RoleName::from("rhys"));
        assert!(role.can_login);
        assert!(!role.is_superuser);
        assert_eq!(role.member_of, btreeset! {RoleName::from("reader")});
        assert_eq!(role.salted_hash.as_deref(), Some("$2a$10$abc"));
        Ok(())
    }

    #[test]
    fn role_without_name_is_malformed() {
        let row = btreemap! {
            "can_login".to_owned() => CqlValue::Boolean(true),
        };
        assert!(matches!(
            Role::from_row(&row),
            Err(ReconcileError::MalformedRow { .. })
        ));
    }
}
