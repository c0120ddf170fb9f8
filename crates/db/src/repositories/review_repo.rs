//! Repository for the `reviews` table: the review gate.
//!
//! A review may exist only for a COMPLETED booking, authored by its renter,
//! at most once. The gate runs inside one transaction; the
//! `uq_reviews_booking_user` constraint backstops the duplicate check.

use kerbside_core::error::CoreError;
use kerbside_core::review::{validate_comment, validate_rating};
use kerbside_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::booking::Booking;
use crate::models::review::{CreateReview, Review};
use crate::models::status::BookingStatus;

/// Column list for `reviews` queries.
const COLUMNS: &str = "id, booking_id, user_id, rating, comment, created_at";

/// Enforces the one-review-per-completed-booking rule.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Attach a review to `booking_id` on behalf of `actor_id`.
    pub async fn create(
        pool: &PgPool,
        actor_id: DbId,
        booking_id: DbId,
        input: &CreateReview,
    ) -> Result<Review, DbError> {
        validate_rating(input.rating)?;
        validate_comment(input.comment.as_deref())?;

        let mut tx = pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(
            "SELECT id, user_id, vehicle_id, start_date, end_date, status_id, \
                    total_price, pickup_location, return_location, notes, \
                    created_at, updated_at \
             FROM bookings WHERE id = $1",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        })?;

        if booking.user_id != actor_id {
            return Err(DbError::Domain(CoreError::Forbidden(
                "only the renter may review their booking".to_string(),
            )));
        }

        if booking.status_id != BookingStatus::Completed.id() {
            return Err(DbError::Domain(CoreError::BookingNotCompleted(format!(
                "booking {booking_id} has not been completed"
            ))));
        }

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE booking_id = $1 AND user_id = $2)",
        )
        .bind(booking_id)
        .bind(actor_id)
        .fetch_one(&mut *tx)
        .await?;

        if exists {
            return Err(DbError::Domain(CoreError::DuplicateReview(format!(
                "booking {booking_id} has already been reviewed"
            ))));
        }

        let query = format!(
            "INSERT INTO reviews (booking_id, user_id, rating, comment) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(booking_id)
            .bind(actor_id)
            .bind(input.rating)
            .bind(input.comment.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(review)
    }

    /// Find a review by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Administrator delete: unconditional, logged.
    pub async fn delete(pool: &PgPool, admin_id: DbId, review_id: DbId) -> Result<Review, DbError> {
        let query = format!("DELETE FROM reviews WHERE id = $1 RETURNING {COLUMNS}");
        let deleted = sqlx::query_as::<_, Review>(&query)
            .bind(review_id)
            .fetch_optional(pool)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Review",
                id: review_id,
            })?;

        tracing::info!(
            admin_id,
            review_id,
            booking_id = deleted.booking_id,
            rating = deleted.rating,
            "Review deleted by administrator"
        );
        Ok(deleted)
    }
}
