//!
//! Cassandra role reconciliation
//!
//! Compares the desired security posture of a single role (login,
//! superuser, password, datacentre access, keyspace permissions and role
//! memberships) with what the cluster's `system_auth` tables report, and
//! produces the statements needed to converge the two.
//!
//! ```
//! use cassandra_role::config::RunConfig;
//! use cassandra_role::desired::{DesiredRoleSpec, RoleState};
//!
//! let desired = DesiredRoleSpec::new("app_user", RoleState::Present).with_password("x");
//! let config = RunConfig { dry_run: true, ..Default::default() };
//! assert!(desired.can_login);
//! assert!(config.dry_run);
//! ```
#![deny(missing_docs)]

pub use error::{QueryError, ReconcileError};
pub use orchestrator::Orchestrator;
pub use report::RunReport;
pub use session::{ReadSession, WriteSession};

pub mod config;
pub mod cql;
pub mod desired;
pub mod entry_types;
pub mod error;
pub mod inspect;
pub mod logging;
pub mod orchestrator;
pub mod permissions;
pub mod reconcile;
pub mod report;
pub mod session;

#[macro_export]
/// Time the code inside the macro. Write the elapsed time to debug logs.
/// Derived from https://notes.iveselov.info/programming/time_it-a-case-study-in-rust-macros
macro_rules! log_runtime {
    ($context:literal, $($tt:tt)+) => {
        {
            $crate::logging::debug!("{}: starting", $context);
            let timer = std::time::Instant::now();
            let x =
            $(
                $tt
            )+;
            $crate::logging::debug!("{}: {:?}", $context, timer.elapsed());
            x
        }
    }
}
