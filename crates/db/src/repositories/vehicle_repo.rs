//! Repository for the `vehicles` table.
//!
//! The stored status is a cached projection of the vehicle's active
//! bookings. `mark_rented` / `mark_available` are the raw side-effect-only
//! writes the booking engine invokes inside its own transactions;
//! `sync_status` recomputes the projection from the booking rows. Manual
//! owner suspensions (MAINTENANCE / OUT_OF_SERVICE) always win over the
//! projection.

use kerbside_core::error::CoreError;
use kerbside_core::types::DbId;
use kerbside_core::vehicle::{
    is_manually_suspended, validate_license_plate, validate_price_per_day, validate_vin,
};
use sqlx::{PgExecutor, PgPool};

use crate::error::DbError;
use crate::models::status::{BookingStatus, VehicleStatus};
use crate::models::vehicle::{CreateVehicle, UpdateVehicle, Vehicle};

/// Column list for `vehicles` queries.
const COLUMNS: &str = "\
    id, owner_id, license_plate, vin, make, model, year, \
    price_per_day, status_id, is_active, created_at, updated_at";

/// Provides CRUD and status-projection operations for vehicles.
pub struct VehicleRepo;

impl VehicleRepo {
    /// Create a new listing for `owner_id`. New vehicles start AVAILABLE.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateVehicle,
    ) -> Result<Vehicle, DbError> {
        validate_license_plate(&input.license_plate)?;
        validate_vin(&input.vin)?;
        validate_price_per_day(input.price_per_day)?;

        let query = format!(
            "INSERT INTO vehicles \
                 (owner_id, license_plate, vin, make, model, year, price_per_day, status_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        let vehicle = sqlx::query_as::<_, Vehicle>(&query)
            .bind(owner_id)
            .bind(input.license_plate.trim())
            .bind(input.vin.to_ascii_uppercase())
            .bind(&input.make)
            .bind(&input.model)
            .bind(input.year)
            .bind(input.price_per_day)
            .bind(VehicleStatus::Available.id())
            .fetch_one(pool)
            .await?;
        Ok(vehicle)
    }

    /// Find a vehicle by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicles WHERE id = $1");
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a vehicle and take a row lock on it.
    ///
    /// The booking-create path locks the vehicle first so that all
    /// concurrent creates for the same vehicle serialize on this row.
    pub async fn find_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicles WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Quick availability probe: exists, listed, and currently AVAILABLE.
    ///
    /// A read-committed view is sufficient here; the authoritative check
    /// happens inside the booking-create transaction.
    pub async fn is_bookable(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE id = $1 AND is_active AND status_id = $2)",
        )
        .bind(id)
        .bind(VehicleStatus::Available.id())
        .fetch_one(pool)
        .await
    }

    /// Idempotent status write: project the vehicle as RENTED.
    ///
    /// Side-effect-only; callers have already validated the transition that
    /// motivates the call and run this on their own transaction.
    pub async fn mark_rented<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE vehicles SET status_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(VehicleStatus::Rented.id())
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Idempotent status write: project the vehicle as AVAILABLE.
    pub async fn mark_available<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE vehicles SET status_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(VehicleStatus::Available.id())
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Recompute the cached projection from the booking rows: RENTED iff at
    /// least one holding-status booking exists, else AVAILABLE.
    ///
    /// Manual suspensions are left untouched (the `WHERE status_id IN`
    /// clause); restoring a suspended vehicle goes through [`Self::restore`].
    /// Must run inside the same transaction as the booking mutation that
    /// motivates the call.
    pub async fn sync_status<'e>(
        executor: impl PgExecutor<'e>,
        vehicle_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE vehicles \
             SET status_id = CASE WHEN EXISTS ( \
                     SELECT 1 FROM bookings \
                     WHERE vehicle_id = $1 AND status_id IN ($2, $3, $4) \
                 ) THEN $5 ELSE $6 END, \
                 updated_at = NOW() \
             WHERE id = $1 AND status_id IN ($5, $6)",
        )
        .bind(vehicle_id)
        .bind(BookingStatus::Pending.id())
        .bind(BookingStatus::Confirmed.id())
        .bind(BookingStatus::Active.id())
        .bind(VehicleStatus::Rented.id())
        .bind(VehicleStatus::Available.id())
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Owner edit of listing fields. Status and ownership are not editable
    /// here.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVehicle,
    ) -> Result<Vehicle, DbError> {
        if let Some(plate) = &input.license_plate {
            validate_license_plate(plate)?;
        }
        if let Some(price) = input.price_per_day {
            validate_price_per_day(price)?;
        }

        let query = format!(
            "UPDATE vehicles SET \
                 license_plate = COALESCE($2, license_plate), \
                 make = COALESCE($3, make), \
                 model = COALESCE($4, model), \
                 year = COALESCE($5, year), \
                 price_per_day = COALESCE($6, price_per_day), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .bind(input.license_plate.as_deref().map(str::trim))
            .bind(input.make.as_deref())
            .bind(input.model.as_deref())
            .bind(input.year)
            .bind(input.price_per_day)
            .fetch_optional(pool)
            .await?;

        updated.ok_or(DbError::Domain(CoreError::NotFound {
            entity: "Vehicle",
            id,
        }))
    }

    /// Manually suspend a vehicle (MAINTENANCE or OUT_OF_SERVICE).
    ///
    /// Suspension wins over the booking-derived projection and excludes the
    /// vehicle from new bookings; existing bookings are unaffected.
    pub async fn suspend(
        pool: &PgPool,
        id: DbId,
        target: VehicleStatus,
    ) -> Result<Vehicle, DbError> {
        if !is_manually_suspended(target.id()) {
            return Err(DbError::Domain(CoreError::Validation(format!(
                "{} is not a manual suspension status",
                target.name()
            ))));
        }

        let query = format!(
            "UPDATE vehicles SET status_id = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .bind(target.id())
            .fetch_optional(pool)
            .await?;

        updated.ok_or(DbError::Domain(CoreError::NotFound {
            entity: "Vehicle",
            id,
        }))
    }

    /// Return a manually suspended vehicle to service.
    ///
    /// The stored status is recomputed from the booking rows rather than
    /// written blindly, so a vehicle with live bookings comes back as
    /// RENTED, not AVAILABLE.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<Vehicle, DbError> {
        let mut tx = pool.begin().await?;

        let vehicle = Self::find_for_update(&mut *tx, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Vehicle",
                id,
            })?;

        if !is_manually_suspended(vehicle.status_id) {
            return Err(DbError::Domain(CoreError::Validation(format!(
                "vehicle {id} is not suspended"
            ))));
        }

        VehicleRepo::mark_available(&mut *tx, id).await?;
        VehicleRepo::sync_status(&mut *tx, id).await?;

        let query = format!("SELECT {COLUMNS} FROM vehicles WHERE id = $1");
        let restored = sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(restored)
    }

    /// Delist a vehicle.
    ///
    /// Rejected while any holding-status booking (in progress or scheduled)
    /// references the vehicle. Booking rows keep their foreign key forever,
    /// so a permitted delete is a soft-delete (`is_active = false`).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Vehicle, DbError> {
        let mut tx = pool.begin().await?;

        let vehicle = Self::find_for_update(&mut *tx, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Vehicle",
                id,
            })?;

        let blocked: bool = sqlx::query_scalar(
            "SELECT EXISTS( \
                 SELECT 1 FROM bookings \
                 WHERE vehicle_id = $1 AND status_id IN ($2, $3, $4) \
             )",
        )
        .bind(id)
        .bind(BookingStatus::Pending.id())
        .bind(BookingStatus::Confirmed.id())
        .bind(BookingStatus::Active.id())
        .fetch_one(&mut *tx)
        .await?;

        if blocked {
            return Err(DbError::Domain(CoreError::Conflict(format!(
                "vehicle {id} has bookings in progress or scheduled"
            ))));
        }

        let query = format!(
            "UPDATE vehicles SET is_active = FALSE, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let deleted = sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            vehicle_id = id,
            owner_id = vehicle.owner_id,
            "Vehicle delisted"
        );
        Ok(deleted)
    }
}
