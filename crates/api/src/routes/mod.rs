pub mod auth;
pub mod booking;
pub mod health;
pub mod review;
pub mod vehicle;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
///
/// /vehicles                            create (agent/admin)
/// /vehicles/{id}                       get, update, delete
/// /vehicles/{id}/availability          bookability probe
/// /vehicles/{id}/status                manual suspend / restore
///
/// /bookings                            create (self or on a customer's behalf)
/// /bookings/{id}                       get
/// /bookings/{id}/confirm               PENDING -> CONFIRMED (agent/admin)
/// /bookings/{id}/activate              CONFIRMED -> ACTIVE (agent/admin)
/// /bookings/{id}/complete              ACTIVE -> COMPLETED (agent/admin)
/// /bookings/{id}/cancel                renter or agent/admin
/// /bookings/{id}/review                createReview (renter)
///
/// /reviews/{id}                        delete (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/vehicles", vehicle::router())
        .nest("/bookings", booking::router())
        .nest("/reviews", review::router())
}
