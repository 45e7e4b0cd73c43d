//! An in-memory stand-in for the `system_auth` tables that understands the
//! statements this crate emits.

#![allow(dead_code)]

use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    sync::Mutex,
};

use anyhow::anyhow;
use async_trait::async_trait;
use maplit::btreemap;

use cassandra_role::{
    logging::{self, LevelFilter},
    permissions::{PermissionKind, Scope},
    session::{CqlValue, Row},
    QueryError, ReadSession, WriteSession,
};

/// Route crate logs to the test output. Safe to call from every test.
pub fn init_logging() {
    logging::setup(Some(LevelFilter::DEBUG));
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredRole {
    pub can_login: bool,
    pub is_superuser: bool,
    pub member_of: BTreeSet<String>,
    pub salted_hash: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    roles: BTreeMap<String, StoredRole>,
    grants: BTreeSet<(String, Scope, PermissionKind)>,
    reads: Vec<String>,
    writes: Vec<String>,
    fail_on: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_role(self, name: &str, can_login: bool, is_superuser: bool) -> Self {
        self.state.lock().unwrap().roles.insert(
            name.to_owned(),
            StoredRole {
                can_login,
                is_superuser,
                ..Default::default()
            },
        );
        self
    }

    pub fn with_grant(self, role: &str, scope: Scope, kind: PermissionKind) -> Self {
        self.state.lock().unwrap().grant(role, scope, kind);
        self
    }

    pub fn with_membership(self, role: &str, member_of: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .roles
            .get_mut(role)
            .expect("seeded role must exist")
            .member_of
            .insert(member_of.to_owned());
        self
    }

    /// Make any write containing `needle` fail.
    pub fn failing_on(self, needle: &str) -> Self {
        self.state.lock().unwrap().fail_on = Some(needle.to_owned());
        self
    }

    pub fn role(&self, name: &str) -> Option<StoredRole> {
        self.state.lock().unwrap().roles.get(name).cloned()
    }

    pub fn grants_of(&self, role: &str) -> BTreeSet<(Scope, PermissionKind)> {
        self.state
            .lock()
            .unwrap()
            .grants
            .iter()
            .filter(|(r, _, _)| r == role)
            .map(|(_, s, k)| (s.to_owned(), *k))
            .collect()
    }

    pub fn reads(&self) -> Vec<String> {
        self.state.lock().unwrap().reads.clone()
    }

    pub fn writes(&self) -> Vec<String> {
        self.state.lock().unwrap().writes.clone()
    }
}

impl State {
    fn grant(&mut self, role: &str, scope: Scope, kind: PermissionKind) {
        if kind.is_composite() {
            for k in PermissionKind::ATOMIC {
                self.grants.insert((role.to_owned(), scope.clone(), k));
            }
        } else {
            self.grants.insert((role.to_owned(), scope, kind));
        }
    }

    fn revoke(&mut self, role: &str, scope: &Scope, kind: PermissionKind) {
        self.grants
            .retain(|(r, s, k)| !(r == role && s == scope && (kind.is_composite() || *k == kind)));
    }

    fn require_role(&self, name: &str) -> Result<(), QueryError> {
        if self.roles.contains_key(name) {
            Ok(())
        } else {
            Err(QueryError::InvalidRequest(format!("{name} doesn't exist")))
        }
    }

    /// The role itself followed by every role it inherits from.
    fn inheritance_chain(&self, role: &str) -> Vec<String> {
        let mut seen = vec![];
        let mut queue = VecDeque::from([role.to_owned()]);
        while let Some(r) = queue.pop_front() {
            if seen.contains(&r) {
                continue;
            }
            if let Some(stored) = self.roles.get(&r) {
                queue.extend(stored.member_of.iter().cloned());
            }
            seen.push(r);
        }
        seen
    }

    fn read(&self, statement: &str) -> Result<Vec<Row>, QueryError> {
        if let Some(rest) =
            statement.strip_prefix("SELECT role FROM system_auth.roles WHERE role = ")
        {
            let (name, _) = take_quoted(rest)?;
            return Ok(self
                .roles
                .get(&name)
                .map(|_| vec![btreemap! {"role".to_owned() => CqlValue::Text(name.to_owned())}])
                .unwrap_or_default());
        }
        if let Some(rest) = statement.strip_prefix(
            "SELECT role, can_login, is_superuser, member_of, salted_hash FROM system_auth.roles WHERE role = ",
        ) {
            let (name, _) = take_quoted(rest)?;
            return Ok(self
                .roles
                .get(&name)
                .map(|r| {
                    vec![btreemap! {
                        "role".to_owned() => CqlValue::Text(name.to_owned()),
                        "can_login".to_owned() => CqlValue::Boolean(r.can_login),
                        "is_superuser".to_owned() => CqlValue::Boolean(r.is_superuser),
                        "member_of".to_owned() => if r.member_of.is_empty() {
                            CqlValue::Null
                        } else {
                            CqlValue::Set(r.member_of.to_owned())
                        },
                        "salted_hash".to_owned() => r
                            .salted_hash
                            .to_owned()
                            .map(CqlValue::Text)
                            .unwrap_or(CqlValue::Null),
                    }]
                })
                .unwrap_or_default());
        }
        if let Some(rest) = statement.strip_prefix("LIST ALL OF ") {
            let (name, _) = take_quoted(rest)?;
            self.require_role(&name)?;
            let mut rows = vec![];
            for holder in self.inheritance_chain(&name) {
                for (r, scope, kind) in &self.grants {
                    if r == &holder {
                        rows.push(btreemap! {
                            "role".to_owned() => CqlValue::Text(holder.to_owned()),
                            "username".to_owned() => CqlValue::Text(name.to_owned()),
                            "resource".to_owned() => CqlValue::Text(scope.resource()),
                            "permission".to_owned() => CqlValue::Text(kind.to_string()),
                        });
                    }
                }
            }
            return Ok(rows);
        }
        Err(QueryError::Other(anyhow!("unsupported read: {statement}")))
    }

    fn write(&mut self, statement: &str) -> Result<(), QueryError> {
        if let Some(rest) = statement.strip_prefix("CREATE ROLE ") {
            let (name, rest) = take_quoted(rest)?;
            if self.roles.contains_key(&name) {
                return Err(QueryError::InvalidRequest(format!("{name} already exists")));
            }
            let mut role = StoredRole::default();
            apply_role_options(&mut role, rest)?;
            self.roles.insert(name, role);
            return Ok(());
        }
        if let Some(rest) = statement.strip_prefix("ALTER ROLE ") {
            let (name, rest) = take_quoted(rest)?;
            self.require_role(&name)?;
            let role = self.roles.get_mut(&name).expect("checked above");
            return apply_role_options(role, rest);
        }
        if let Some(rest) = statement.strip_prefix("DROP ROLE ") {
            let (name, _) = take_quoted(rest)?;
            self.require_role(&name)?;
            self.roles.remove(&name);
            self.grants.retain(|(r, _, _)| r != &name);
            for role in self.roles.values_mut() {
                role.member_of.remove(&name);
            }
            return Ok(());
        }
        if let Some(rest) = statement.strip_prefix("GRANT '") {
            let (member_of, rest) = take_quoted(&format!("'{rest}"))?;
            let (name, _) = take_quoted(expect_prefix(&rest, " TO ")?)?;
            self.require_role(&member_of)?;
            self.require_role(&name)?;
            self.roles
                .get_mut(&name)
                .expect("checked above")
                .member_of
                .insert(member_of);
            return Ok(());
        }
        if let Some(rest) = statement.strip_prefix("REVOKE '") {
            let (member_of, rest) = take_quoted(&format!("'{rest}"))?;
            let (name, _) = take_quoted(expect_prefix(&rest, " FROM ")?)?;
            self.require_role(&name)?;
            let role = self.roles.get_mut(&name).expect("checked above");
            if !role.member_of.remove(&member_of) {
                return Err(QueryError::InvalidRequest(format!(
                    "{name} is not a member of {member_of}"
                )));
            }
            return Ok(());
        }
        if let Some(rest) = statement.strip_prefix("GRANT ") {
            let (kind, scope, name) = parse_permission_statement(rest, " TO ")?;
            self.require_role(&name)?;
            self.grant(&name, scope, kind);
            return Ok(());
        }
        if let Some(rest) = statement.strip_prefix("REVOKE ") {
            let (kind, scope, name) = parse_permission_statement(rest, " FROM ")?;
            self.require_role(&name)?;
            self.revoke(&name, &scope, kind);
            return Ok(());
        }
        Err(QueryError::Other(anyhow!("unsupported write: {statement}")))
    }
}

/// Parse a leading `'...'` literal, returning it unescaped and the rest.
fn take_quoted(s: &str) -> Result<(String, String), QueryError> {
    let body = s
        .strip_prefix('\'')
        .ok_or_else(|| QueryError::Other(anyhow!("expected a quoted literal in {s}")))?;
    let mut value = String::new();
    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '\'' {
            if matches!(chars.peek(), Some((_, '\''))) {
                chars.next();
                value.push('\'');
            } else {
                return Ok((value, body[i + 1..].to_owned()));
            }
        } else {
            value.push(c);
        }
    }
    Err(QueryError::Other(anyhow!("unterminated literal in {s}")))
}

fn expect_prefix<'a>(s: &'a str, prefix: &str) -> Result<&'a str, QueryError> {
    s.strip_prefix(prefix)
        .ok_or_else(|| QueryError::Other(anyhow!("expected `{prefix}` in {s}")))
}

fn parse_permission_statement(
    rest: &str,
    separator: &str,
) -> Result<(PermissionKind, Scope, String), QueryError> {
    let (kind, rest) = rest
        .split_once(" ON ")
        .ok_or_else(|| QueryError::Other(anyhow!("missing ON in {rest}")))?;
    let (target, grantee) = rest
        .split_once(separator)
        .ok_or_else(|| QueryError::Other(anyhow!("missing `{separator}` in {rest}")))?;
    let kind: PermissionKind = kind
        .parse()
        .map_err(|bad| QueryError::InvalidRequest(format!("unknown permission {bad}")))?;
    let scope = match target {
        "ALL KEYSPACES" => Scope::AllKeyspaces,
        other => Scope::Keyspace(expect_prefix(other, "KEYSPACE ")?.to_owned()),
    };
    let (name, _) = take_quoted(grantee)?;
    Ok((kind, scope, name))
}

fn apply_role_options(role: &mut StoredRole, rest: String) -> Result<(), QueryError> {
    let Some(options) = rest.strip_prefix(" WITH ") else {
        return Ok(());
    };
    for clause in options.split(" AND ") {
        if let Some(v) = clause.strip_prefix("SUPERUSER = ") {
            role.is_superuser = v == "true";
        } else if let Some(v) = clause.strip_prefix("LOGIN = ") {
            role.can_login = v == "true";
        } else if let Some(v) = clause.strip_prefix("PASSWORD = ") {
            let (password, _) = take_quoted(v)?;
            role.salted_hash = Some(format!("hashed:{password}"));
        }
    }
    Ok(())
}

#[async_trait]
impl ReadSession for MemoryStore {
    async fn execute_read(&self, statement: &str) -> Result<Vec<Row>, QueryError> {
        let mut state = self.state.lock().unwrap();
        state.reads.push(statement.to_owned());
        state.read(statement)
    }
}

#[async_trait]
impl WriteSession for MemoryStore {
    async fn execute_write(&self, statement: &str) -> Result<(), QueryError> {
        let mut state = self.state.lock().unwrap();
        if let Some(needle) = &state.fail_on {
            if statement.contains(needle.as_str()) {
                return Err(QueryError::Other(anyhow!("write timeout")));
            }
        }
        state.write(statement)?;
        state.writes.push(statement.to_owned());
        Ok(())
    }
}
