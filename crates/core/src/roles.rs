//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000001_create_roles_and_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_AGENT: &str = "agent";
pub const ROLE_CUSTOMER: &str = "customer";

/// Staff roles may list vehicles and drive the booking lifecycle.
pub fn is_staff(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_AGENT
}
