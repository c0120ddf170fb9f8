use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{bookings, reviews};
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// POST   /                    create
/// GET    /{id}                get_by_id
/// POST   /{id}/confirm        confirm
/// POST   /{id}/activate       activate
/// POST   /{id}/complete       complete
/// POST   /{id}/cancel         cancel
/// POST   /{id}/review         create review
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(bookings::create))
        .route("/{id}", get(bookings::get_by_id))
        .route("/{id}/confirm", post(bookings::confirm))
        .route("/{id}/activate", post(bookings::activate))
        .route("/{id}/complete", post(bookings::complete))
        .route("/{id}/cancel", post(bookings::cancel))
        .route("/{id}/review", post(reviews::create))
}
