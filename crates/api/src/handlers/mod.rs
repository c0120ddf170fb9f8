//! HTTP handlers. Thin: deserialize, authorize the HTTP surface, call into
//! the repositories, wrap the result in the response envelope.

pub mod auth;
pub mod bookings;
pub mod health;
pub mod reviews;
pub mod vehicles;
