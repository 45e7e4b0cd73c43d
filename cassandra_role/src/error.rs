//! Errors raised while reconciling a role.

use thiserror::Error;

/// Failure reported by a read or write session.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The store rejected the statement, e.g. `LIST ALL OF` a role that
    /// does not exist.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Any other transport or execution failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Everything that can abort a reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// One or more permission names are not in the catalog. Raised before
    /// any query is issued.
    #[error("invalid permission provided in keyspace_permissions: {}", .0.join(", "))]
    Validation(Vec<String>),
    /// Attributes were requested for a role that does not exist.
    #[error("role `{0}` does not exist")]
    NotFound(String),
    /// A statement failed to execute. Statements applied before this one
    /// are not rolled back.
    #[error("{source} | {statement}")]
    Store {
        /// The statement that failed, with any password redacted.
        statement: String,
        /// The session error.
        #[source]
        source: QueryError,
    },
    /// A row returned by the store did not have the expected shape.
    #[error("unexpected row from {table}: {reason}")]
    MalformedRow {
        /// Where the row came from.
        table: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

impl ReconcileError {
    pub(crate) fn store(statement: impl Into<String>, source: QueryError) -> Self {
        ReconcileError::Store {
            statement: statement.into(),
            source,
        }
    }
}
