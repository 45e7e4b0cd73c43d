//! Read-side inspection of the current role and grant state.
//!
//! Everything here goes through a [`ReadSession`] and returns plain
//! snapshots; nothing is cached between calls, so a reconciler that runs
//! after a write always sees fresh state.

mod permissions;
mod roles;

pub use permissions::PermissionInspector;
pub use roles::RoleInspector;

use crate::{
    cql,
    entry_types::{PermissionRow, RoleName},
    error::{QueryError, ReconcileError},
    logging::debug,
    session::{FromRow, ReadSession},
};

/// Run `LIST ALL OF` for a role. A role the store does not know about
/// lists nothing.
async fn list_permission_rows<R>(
    session: &R,
    role: &RoleName,
) -> Result<Vec<PermissionRow>, ReconcileError>
where
    R: ReadSession + ?Sized,
{
    let statement = cql::list_all_of(role);
    match session.execute_read(&statement).await {
        Ok(rows) => PermissionRow::from_rows(&rows),
        Err(QueryError::InvalidRequest(reason)) => {
            debug!("no permissions listed for {role}: {reason}");
            Ok(vec![])
        }
        Err(e) => Err(ReconcileError::store(statement, e)),
    }
}
