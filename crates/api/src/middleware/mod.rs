//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from a JWT Bearer token.
//! - [`rbac::RequireEditor`] -- Requires a stored `admin` or `super_admin` profile.

pub mod auth;
pub mod rbac;
