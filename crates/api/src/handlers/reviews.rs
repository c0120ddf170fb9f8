//! Handlers for the review gate.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kerbside_core::types::DbId;
use kerbside_db::models::review::CreateReview;
use kerbside_db::repositories::ReviewRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/bookings/{booking_id}/review
///
/// Attach a review to a completed booking. The gate (ownership, completion,
/// single-review, rating bounds) is enforced by the engine.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    Json(input): Json<CreateReview>,
) -> AppResult<impl IntoResponse> {
    let review = ReviewRepo::create(&state.pool, user.user_id, booking_id, &input).await?;

    tracing::info!(
        user_id = user.user_id,
        booking_id,
        review_id = review.id,
        rating = review.rating,
        "Review created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// DELETE /api/v1/reviews/{id}
///
/// Admin-only, unconditional; the repository logs the action.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(review_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let review = ReviewRepo::delete(&state.pool, admin.user_id, review_id).await?;
    Ok(Json(DataResponse { data: review }))
}
