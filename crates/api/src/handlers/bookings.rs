//! Handlers for the booking lifecycle.
//!
//! The engine itself (repositories + core rules) enforces the guards; these
//! handlers resolve who the renter is, invoke the engine, and fire the
//! post-commit notification.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kerbside_core::error::CoreError;
use kerbside_core::roles::is_staff;
use kerbside_core::types::DbId;
use kerbside_db::models::booking::{Booking, BookingResponse, CreateBooking};
use kerbside_db::models::status::BookingStatus;
use kerbside_db::repositories::{BookingRepo, UserRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::notifications::dispatch_confirmation;
use crate::response::DataResponse;
use crate::state::AppState;

/// Resolve the renter for a create request.
///
/// Plain requests book for the caller. When `customer_id` names someone
/// else, the caller must be staff and the customer must be an active
/// account (booking on a customer's behalf at the rental desk).
async fn resolve_renter(
    state: &AppState,
    actor: &AuthUser,
    customer_id: Option<DbId>,
) -> Result<DbId, AppError> {
    let customer_id = match customer_id {
        Some(id) if id != actor.user_id => id,
        _ => return Ok(actor.user_id),
    };

    if !is_staff(&actor.role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Agent or admin role required to book on behalf of a customer".into(),
        )));
    }

    let customer = UserRepo::find_by_id(&state.pool, customer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: customer_id,
        }))?;

    if !customer.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "customer account {customer_id} is deactivated"
        ))));
    }

    Ok(customer.id)
}

/// Reject unless the actor rented the booking or is staff.
fn ensure_renter_or_staff(booking: &Booking, user: &AuthUser) -> Result<(), AppError> {
    if booking.user_id == user.user_id || is_staff(&user.role) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the renter or staff may view this booking".into(),
        )))
    }
}

/// POST /api/v1/bookings
///
/// Create a booking in state PENDING. The engine validates dates, vehicle
/// eligibility, and interval overlap atomically per vehicle.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBooking>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let renter_id = resolve_renter(&state, &user, input.customer_id).await?;

    let booking =
        BookingRepo::create(&state.pool, renter_id, &input, &state.config.booking_policy).await?;

    tracing::info!(
        user_id = user.user_id,
        renter_id,
        booking_id = booking.id,
        vehicle_id = booking.vehicle_id,
        total_price = %booking.total_price,
        "Booking created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: BookingResponse::from(booking),
        }),
    ))
}

/// GET /api/v1/bookings/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = BookingRepo::find_by_id(&state.pool, booking_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        }))?;

    ensure_renter_or_staff(&booking, &user)?;

    Ok(Json(DataResponse {
        data: BookingResponse::from(booking),
    }))
}

/// POST /api/v1/bookings/{id}/confirm
///
/// PENDING -> CONFIRMED. The confirmation notification is dispatched after
/// the transaction commits and never blocks the response.
pub async fn confirm(
    user: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = BookingRepo::transition(
        &state.pool,
        user.user_id,
        &user.role,
        booking_id,
        BookingStatus::Confirmed,
    )
    .await?;

    dispatch_confirmation(state.notifier.clone(), booking.clone());

    tracing::info!(user_id = user.user_id, booking_id, "Booking confirmed");

    Ok(Json(DataResponse {
        data: BookingResponse::from(booking),
    }))
}

/// POST /api/v1/bookings/{id}/activate
///
/// CONFIRMED -> ACTIVE (vehicle handed over).
pub async fn activate(
    user: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = BookingRepo::transition(
        &state.pool,
        user.user_id,
        &user.role,
        booking_id,
        BookingStatus::Active,
    )
    .await?;

    tracing::info!(user_id = user.user_id, booking_id, "Booking activated");

    Ok(Json(DataResponse {
        data: BookingResponse::from(booking),
    }))
}

/// POST /api/v1/bookings/{id}/complete
///
/// ACTIVE -> COMPLETED (vehicle returned).
pub async fn complete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = BookingRepo::transition(
        &state.pool,
        user.user_id,
        &user.role,
        booking_id,
        BookingStatus::Completed,
    )
    .await?;

    tracing::info!(user_id = user.user_id, booking_id, "Booking completed");

    Ok(Json(DataResponse {
        data: BookingResponse::from(booking),
    }))
}

/// POST /api/v1/bookings/{id}/cancel
///
/// Renter or staff; legal from PENDING or CONFIRMED only.
pub async fn cancel(
    user: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking =
        BookingRepo::cancel(&state.pool, user.user_id, &user.role, booking_id).await?;

    tracing::info!(user_id = user.user_id, booking_id, "Booking cancelled");

    Ok(Json(DataResponse {
        data: BookingResponse::from(booking),
    }))
}
