//! Vehicle entity model and DTOs.

use kerbside_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::status::{StatusId, VehicleStatus};

/// A row from the `vehicles` table.
#[derive(Debug, Clone, FromRow)]
pub struct Vehicle {
    pub id: DbId,
    /// The listing agent.
    pub owner_id: DbId,
    pub license_plate: String,
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: i16,
    pub price_per_day: Decimal,
    pub status_id: StatusId,
    /// Soft-delete / listing flag.
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Vehicle representation for API responses, with the status name resolved.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleResponse {
    pub id: DbId,
    pub owner_id: DbId,
    pub license_plate: String,
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: i16,
    pub price_per_day: Decimal,
    pub status: &'static str,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        let status = VehicleStatus::from_id(vehicle.status_id)
            .map(VehicleStatus::name)
            .unwrap_or("UNKNOWN");
        Self {
            id: vehicle.id,
            owner_id: vehicle.owner_id,
            license_plate: vehicle.license_plate,
            vin: vehicle.vin,
            make: vehicle.make,
            model: vehicle.model,
            year: vehicle.year,
            price_per_day: vehicle.price_per_day,
            status,
            is_active: vehicle.is_active,
            created_at: vehicle.created_at,
        }
    }
}

/// DTO for creating a new vehicle listing.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicle {
    #[validate(length(min = 2, max = 20))]
    pub license_plate: String,

    #[validate(length(min = 17, max = 17))]
    pub vin: String,

    #[validate(length(min = 1, max = 100))]
    pub make: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1950, max = 2035))]
    pub year: i16,

    pub price_per_day: Decimal,
}

/// DTO for updating an existing vehicle. All fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicle {
    #[validate(length(min = 2, max = 20))]
    pub license_plate: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1950, max = 2035))]
    pub year: Option<i16>,

    pub price_per_day: Option<Decimal>,
}

/// DTO for manually suspending or restoring a vehicle.
///
/// Accepts `MAINTENANCE`, `OUT_OF_SERVICE`, or `AVAILABLE` (restore).
/// `RENTED` is a derived projection and cannot be set by hand.
#[derive(Debug, Deserialize)]
pub struct SetVehicleStatus {
    pub status: String,
}

/// Response for `GET /vehicles/{id}/availability`.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub vehicle_id: DbId,
    pub bookable: bool,
}
