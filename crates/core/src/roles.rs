//! Well-known role name constants.
//!
//! These must match the `ck_profiles_role` check in `20260101000001_create_profiles.sql`.

pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CLIENT: &str = "client";

/// Roles allowed to change wizard structure and read submissions.
pub const EDITOR_ROLES: [&str; 2] = [ROLE_SUPER_ADMIN, ROLE_ADMIN];

/// Whether `role` may perform structural mutations.
pub fn is_editor_role(role: &str) -> bool {
    EDITOR_ROLES.contains(&role)
}
