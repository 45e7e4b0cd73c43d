//! Typed snapshots of rows read from `system_auth`.

mod grant;
mod permission_row;
mod role;

pub use grant::GrantRow;
pub use permission_row::PermissionRow;
pub use role::{Role, RoleName};
