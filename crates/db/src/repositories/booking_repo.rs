//! Repository for the `bookings` table: the booking engine itself.
//!
//! The create path is the only cross-request hazard in the system. It runs
//! entirely inside one transaction that first row-locks the vehicle
//! (`SELECT ... FOR UPDATE`), so concurrent creates for the same vehicle
//! serialize and the overlap check-then-insert is atomic. A partial GiST
//! exclusion constraint on the table backstops the check at the storage
//! layer.
//!
//! Status transitions are single-row updates guarded by the expected current
//! status; a stale read surfaces as `InvalidTransition`, never a silent
//! no-op.

use chrono::Utc;
use kerbside_core::booking::{
    state_machine, validate_date_range, BookingPolicy, HOLDING_STATUSES,
};
use kerbside_core::error::CoreError;
use kerbside_core::pricing::rental_price;
use kerbside_core::types::DbId;
use kerbside_core::vehicle::{is_manually_suspended, status_name as vehicle_status_name};
use sqlx::{PgExecutor, PgPool};

use crate::error::DbError;
use crate::models::booking::{Booking, CreateBooking};
use crate::models::status::BookingStatus;
use crate::repositories::VehicleRepo;

/// Column list for `bookings` queries.
const COLUMNS: &str = "\
    id, user_id, vehicle_id, start_date, end_date, status_id, \
    total_price, pickup_location, return_location, notes, \
    created_at, updated_at";

/// Provides the overlap-safe create path and lifecycle transitions.
pub struct BookingRepo;

impl BookingRepo {
    /// Find a booking by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a booking for `renter_id` in state PENDING.
    ///
    /// Guards, in order: date-range validity (calendar, not-in-past,
    /// policy cap), vehicle eligibility (exists, listed, not manually
    /// suspended), and the interval-overlap check against every
    /// holding-status booking for the vehicle. The total price is computed
    /// from the vehicle's current daily rate and frozen on the row.
    ///
    /// The whole sequence, including projecting the vehicle as RENTED, is
    /// one transaction serialized per vehicle by the row lock.
    pub async fn create(
        pool: &PgPool,
        renter_id: DbId,
        input: &CreateBooking,
        policy: &BookingPolicy,
    ) -> Result<Booking, DbError> {
        let today = Utc::now().date_naive();
        validate_date_range(input.start_date, input.end_date, today, policy)?;

        let mut tx = pool.begin().await?;

        // Serialization point: every create for this vehicle queues here.
        let vehicle = VehicleRepo::find_for_update(&mut *tx, input.vehicle_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Vehicle",
                id: input.vehicle_id,
            })?;

        if !vehicle.is_active {
            return Err(DbError::Domain(CoreError::VehicleUnavailable(format!(
                "vehicle {} is no longer listed",
                vehicle.id
            ))));
        }

        if is_manually_suspended(vehicle.status_id) {
            return Err(DbError::Domain(CoreError::VehicleUnavailable(format!(
                "vehicle {} is {}",
                vehicle.id,
                vehicle_status_name(vehicle.status_id)
            ))));
        }

        let overlapping: bool = sqlx::query_scalar(
            "SELECT EXISTS( \
                 SELECT 1 FROM bookings \
                 WHERE vehicle_id = $1 AND status_id IN ($2, $3, $4) \
                   AND start_date < $6 AND $5 < end_date \
             )",
        )
        .bind(vehicle.id)
        .bind(HOLDING_STATUSES[0])
        .bind(HOLDING_STATUSES[1])
        .bind(HOLDING_STATUSES[2])
        .bind(input.start_date)
        .bind(input.end_date)
        .fetch_one(&mut *tx)
        .await?;

        if overlapping {
            return Err(DbError::Domain(CoreError::OverlappingBooking(format!(
                "vehicle {} is already booked within {} to {}",
                vehicle.id, input.start_date, input.end_date
            ))));
        }

        let total_price = rental_price(vehicle.price_per_day, input.start_date, input.end_date);

        let query = format!(
            "INSERT INTO bookings \
                 (user_id, vehicle_id, start_date, end_date, status_id, total_price, \
                  pickup_location, return_location, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(renter_id)
            .bind(vehicle.id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(BookingStatus::Pending.id())
            .bind(total_price)
            .bind(input.pickup_location.as_deref())
            .bind(input.return_location.as_deref())
            .bind(input.notes.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        // The new PENDING booking holds the vehicle.
        VehicleRepo::mark_rented(&mut *tx, vehicle.id).await?;

        tx.commit().await?;
        Ok(booking)
    }

    /// Drive a booking to `target`, enforcing the capability table and the
    /// state machine, and keeping the vehicle projection in sync.
    ///
    /// The status write is guarded by the status that was just read; if a
    /// concurrent transition got there first, zero rows match and the
    /// caller gets `InvalidTransition` instead of a corrupted state.
    pub async fn transition(
        pool: &PgPool,
        actor_id: DbId,
        actor_role: &str,
        booking_id: DbId,
        target: BookingStatus,
    ) -> Result<Booking, DbError> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(booking_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Booking",
                id: booking_id,
            })?;

        let is_renter = booking.user_id == actor_id;
        state_machine::authorize_transition(target.id(), actor_role, is_renter)?;
        state_machine::validate_transition(booking.status_id, target.id())?;

        let query = format!(
            "UPDATE bookings SET status_id = $2, updated_at = NOW() \
             WHERE id = $1 AND status_id = $3 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Booking>(&query)
            .bind(booking_id)
            .bind(target.id())
            .bind(booking.status_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                CoreError::InvalidTransition(format!(
                    "booking {booking_id} was moved out of {} concurrently",
                    state_machine::status_name(booking.status_id)
                ))
            })?;

        // Leaving the holding set may free the vehicle; recompute the
        // projection in the same transaction.
        match target {
            BookingStatus::Cancelled | BookingStatus::Completed => {
                VehicleRepo::sync_status(&mut *tx, updated.vehicle_id).await?;
            }
            _ => {}
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Cancel a booking (renter, agent, or admin). Legal only from PENDING
    /// or CONFIRMED; an in-progress rental ends via complete.
    pub async fn cancel(
        pool: &PgPool,
        actor_id: DbId,
        actor_role: &str,
        booking_id: DbId,
    ) -> Result<Booking, DbError> {
        Self::transition(pool, actor_id, actor_role, booking_id, BookingStatus::Cancelled).await
    }

    /// Count holding-status bookings for a vehicle (projection probes in
    /// tests and ops tooling).
    pub async fn count_holding<'e>(
        executor: impl PgExecutor<'e>,
        vehicle_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE vehicle_id = $1 AND status_id IN ($2, $3, $4)",
        )
        .bind(vehicle_id)
        .bind(HOLDING_STATUSES[0])
        .bind(HOLDING_STATUSES[1])
        .bind(HOLDING_STATUSES[2])
        .fetch_one(executor)
        .await
    }
}
