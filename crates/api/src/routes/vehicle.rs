use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::vehicles;
use crate::state::AppState;

/// Routes mounted at `/vehicles`.
///
/// ```text
/// POST   /                    create
/// GET    /{id}                get_by_id
/// PUT    /{id}                update
/// DELETE /{id}                delete
/// GET    /{id}/availability   availability
/// PUT    /{id}/status         set_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(vehicles::create))
        .route(
            "/{id}",
            get(vehicles::get_by_id)
                .put(vehicles::update)
                .delete(vehicles::delete),
        )
        .route("/{id}/availability", get(vehicles::availability))
        .route("/{id}/status", put(vehicles::set_status))
}
