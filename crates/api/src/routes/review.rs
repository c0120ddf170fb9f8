use axum::routing::delete;
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// Routes mounted at `/reviews`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(reviews::delete))
}
