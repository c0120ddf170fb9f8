//! Handlers for vehicle listings.
//!
//! Listing CRUD is an agent concern; the stored status is a projection the
//! booking engine maintains, so the manual status endpoint only accepts
//! suspension states and restore.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kerbside_core::error::CoreError;
use kerbside_core::roles::ROLE_ADMIN;
use kerbside_core::types::DbId;
use kerbside_db::models::status::VehicleStatus;
use kerbside_db::models::vehicle::{
    AvailabilityResponse, CreateVehicle, SetVehicleStatus, UpdateVehicle, Vehicle, VehicleResponse,
};
use kerbside_db::repositories::VehicleRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAgent;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch a vehicle or fail with 404.
pub async fn ensure_vehicle_exists(
    pool: &kerbside_db::DbPool,
    vehicle_id: DbId,
) -> Result<Vehicle, AppError> {
    VehicleRepo::find_by_id(pool, vehicle_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Vehicle",
            id: vehicle_id,
        }))
}

/// Reject unless the actor owns the listing or is an admin.
fn ensure_owner_or_admin(vehicle: &Vehicle, user: &AuthUser) -> Result<(), AppError> {
    if vehicle.owner_id == user.user_id || user.role == ROLE_ADMIN {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the owning agent or an admin may manage this vehicle".into(),
        )))
    }
}

/// POST /api/v1/vehicles
///
/// Create a listing owned by the calling agent.
pub async fn create(
    RequireAgent(user): RequireAgent,
    State(state): State<AppState>,
    Json(input): Json<CreateVehicle>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let vehicle = VehicleRepo::create(&state.pool, user.user_id, &input).await?;

    tracing::info!(
        user_id = user.user_id,
        vehicle_id = vehicle.id,
        license_plate = %vehicle.license_plate,
        "Vehicle listed"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: VehicleResponse::from(vehicle),
        }),
    ))
}

/// GET /api/v1/vehicles/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(vehicle_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let vehicle = ensure_vehicle_exists(&state.pool, vehicle_id).await?;
    Ok(Json(DataResponse {
        data: VehicleResponse::from(vehicle),
    }))
}

/// GET /api/v1/vehicles/{id}/availability
///
/// Quick bookability probe from a read-committed view; the authoritative
/// check runs inside the booking-create transaction.
pub async fn availability(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(vehicle_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_vehicle_exists(&state.pool, vehicle_id).await?;
    let bookable = VehicleRepo::is_bookable(&state.pool, vehicle_id).await?;
    Ok(Json(DataResponse {
        data: AvailabilityResponse {
            vehicle_id,
            bookable,
        },
    }))
}

/// PUT /api/v1/vehicles/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(vehicle_id): Path<DbId>,
    Json(input): Json<UpdateVehicle>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let vehicle = ensure_vehicle_exists(&state.pool, vehicle_id).await?;
    ensure_owner_or_admin(&vehicle, &user)?;

    let updated = VehicleRepo::update(&state.pool, vehicle_id, &input).await?;

    tracing::info!(user_id = user.user_id, vehicle_id, "Vehicle updated");

    Ok(Json(DataResponse {
        data: VehicleResponse::from(updated),
    }))
}

/// PUT /api/v1/vehicles/{id}/status
///
/// Manual suspension (`MAINTENANCE`, `OUT_OF_SERVICE`) or restore
/// (`AVAILABLE`). `RENTED` is booking-derived and cannot be set by hand.
pub async fn set_status(
    user: AuthUser,
    State(state): State<AppState>,
    Path(vehicle_id): Path<DbId>,
    Json(input): Json<SetVehicleStatus>,
) -> AppResult<impl IntoResponse> {
    let vehicle = ensure_vehicle_exists(&state.pool, vehicle_id).await?;
    ensure_owner_or_admin(&vehicle, &user)?;

    let target = VehicleStatus::from_name(&input.status).ok_or_else(|| {
        AppError::BadRequest(format!("Unknown vehicle status '{}'", input.status))
    })?;

    let updated = match target {
        VehicleStatus::Maintenance | VehicleStatus::OutOfService => {
            VehicleRepo::suspend(&state.pool, vehicle_id, target).await?
        }
        VehicleStatus::Available => VehicleRepo::restore(&state.pool, vehicle_id).await?,
        VehicleStatus::Rented => {
            return Err(AppError::Core(CoreError::Validation(
                "RENTED is derived from bookings and cannot be set manually".into(),
            )))
        }
    };

    tracing::info!(
        user_id = user.user_id,
        vehicle_id,
        status = updated_status_name(&updated),
        "Vehicle status changed manually"
    );

    Ok(Json(DataResponse {
        data: VehicleResponse::from(updated),
    }))
}

fn updated_status_name(vehicle: &Vehicle) -> &'static str {
    VehicleStatus::from_id(vehicle.status_id)
        .map(VehicleStatus::name)
        .unwrap_or("UNKNOWN")
}

/// DELETE /api/v1/vehicles/{id}
///
/// Rejected while bookings hold the vehicle; otherwise a soft-delete.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(vehicle_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let vehicle = ensure_vehicle_exists(&state.pool, vehicle_id).await?;
    ensure_owner_or_admin(&vehicle, &user)?;

    let deleted = VehicleRepo::delete(&state.pool, vehicle_id).await?;

    Ok(Json(DataResponse {
        data: VehicleResponse::from(deleted),
    }))
}
