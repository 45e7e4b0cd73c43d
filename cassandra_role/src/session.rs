//! The read and write query paths consumed from the surrounding driver.
//!
//! The two are separate capabilities so that each can be bound to its own
//! consistency level (see [`crate::config::ConsistencyLevel`]). Connection
//! lifecycle, retries and timeouts belong to the implementor.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, ReconcileError};

/// A single column value as returned by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CqlValue {
    /// NULL or an unset column.
    Null,
    /// A boolean column.
    Boolean(bool),
    /// A text column.
    Text(String),
    /// A set<text> column.
    Set(BTreeSet<String>),
}

/// One result row, keyed by column name.
pub type Row = BTreeMap<String, CqlValue>;

/// Read-oriented query path.
#[async_trait]
pub trait ReadSession: Send + Sync {
    /// Execute a statement and return its rows in order.
    async fn execute_read(&self, statement: &str) -> Result<Vec<Row>, QueryError>;
}

/// Write-oriented query path.
#[async_trait]
pub trait WriteSession: Send + Sync {
    /// Execute a statement, dropping any result.
    async fn execute_write(&self, statement: &str) -> Result<(), QueryError>;
}

/// Conversion from a driver row into a typed entry.
pub trait FromRow: Sized {
    /// Name of the table or listing the rows come from, for error messages.
    const SOURCE: &'static str;

    /// Build the entry, failing if a column is missing or mistyped.
    fn from_row(row: &Row) -> Result<Self, ReconcileError>;

    /// Convert every row.
    fn from_rows(rows: &[Row]) -> Result<Vec<Self>, ReconcileError> {
        rows.iter().map(Self::from_row).collect()
    }
}

/// Column accessors shared by the `FromRow` implementations.
pub(crate) struct Columns<'a> {
    row: &'a Row,
    source: &'static str,
}

impl<'a> Columns<'a> {
    pub(crate) fn new(row: &'a Row, source: &'static str) -> Self {
        Self { row, source }
    }

    fn malformed(&self, reason: String) -> ReconcileError {
        ReconcileError::MalformedRow {
            table: self.source,
            reason,
        }
    }

    pub(crate) fn text(&self, column: &str) -> Result<String, ReconcileError> {
        match self.row.get(column) {
            Some(CqlValue::Text(t)) => Ok(t.to_owned()),
            other => Err(self.malformed(format!("expected text in `{column}`, got {other:?}"))),
        }
    }

    pub(crate) fn optional_text(&self, column: &str) -> Result<Option<String>, ReconcileError> {
        match self.row.get(column) {
            None | Some(CqlValue::Null) => Ok(None),
            Some(CqlValue::Text(t)) => Ok(Some(t.to_owned())),
            other => Err(self.malformed(format!("expected text in `{column}`, got {other:?}"))),
        }
    }

    /// NULL booleans read as false, the way the store reports unset flags.
    pub(crate) fn boolean(&self, column: &str) -> Result<bool, ReconcileError> {
        match self.row.get(column) {
            Some(CqlValue::Boolean(b)) => Ok(*b),
            Some(CqlValue::Null) => Ok(false),
            other => Err(self.malformed(format!("expected boolean in `{column}`, got {other:?}"))),
        }
    }

    /// NULL sets read as empty.
    pub(crate) fn set(&self, column: &str) -> Result<BTreeSet<String>, ReconcileError> {
        match self.row.get(column) {
            None | Some(CqlValue::Null) => Ok(BTreeSet::new()),
            Some(CqlValue::Set(s)) => Ok(s.to_owned()),
            other => Err(self.malformed(format!("expected set in `{column}`, got {other:?}"))),
        }
    }
}
