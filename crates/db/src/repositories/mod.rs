//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or a transaction executor) as the first argument.
//! Engine operations return [`crate::error::DbError`] so callers receive
//! typed domain rejections; plain lookups return `sqlx::Error`.

pub mod booking_repo;
pub mod review_repo;
pub mod user_repo;
pub mod vehicle_repo;

pub use booking_repo::BookingRepo;
pub use review_repo::ReviewRepo;
pub use user_repo::UserRepo;
pub use vehicle_repo::VehicleRepo;
