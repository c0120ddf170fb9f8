//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts (validator-derived field checks)
//! - A `Serialize` response struct resolving status ids to their wire names

pub mod booking;
pub mod review;
pub mod status;
pub mod user;
pub mod vehicle;
