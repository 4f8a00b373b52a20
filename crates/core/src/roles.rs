//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in the initial
//! migration.

pub const ROLE_AGENT: &str = "agent";
pub const ROLE_ADMIN: &str = "admin";

/// Returns `true` if `role` is one of the known role names.
pub fn is_known_role(role: &str) -> bool {
    matches!(role, ROLE_AGENT | ROLE_ADMIN)
}
