//! Booking entity model and DTOs for the booking engine.

use chrono::NaiveDate;
use kerbside_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::status::{BookingStatus, StatusId};

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: DbId,
    /// The renter.
    pub user_id: DbId,
    pub vehicle_id: DbId,
    /// Rental interval, half-open: `[start_date, end_date)`.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status_id: StatusId,
    /// Computed once at creation; immutable thereafter.
    pub total_price: Decimal,
    pub pickup_location: Option<String>,
    pub return_location: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Booking representation for API responses, with the status name resolved.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub vehicle_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: &'static str,
    pub total_price: Decimal,
    pub pickup_location: Option<String>,
    pub return_location: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        let status = BookingStatus::from_id(booking.status_id)
            .map(BookingStatus::name)
            .unwrap_or("UNKNOWN");
        Self {
            id: booking.id,
            user_id: booking.user_id,
            vehicle_id: booking.vehicle_id,
            start_date: booking.start_date,
            end_date: booking.end_date,
            status,
            total_price: booking.total_price,
            pickup_location: booking.pickup_location,
            return_location: booking.return_location,
            notes: booking.notes,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// DTO for creating a booking via `POST /bookings`.
///
/// `customer_id` lets an agent or admin book on a customer's behalf; when
/// absent, the authenticated caller is the renter.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBooking {
    pub vehicle_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub customer_id: Option<DbId>,

    #[validate(length(max = 200))]
    pub pickup_location: Option<String>,

    #[validate(length(max = 200))]
    pub return_location: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}
