//! Error type for repository operations.
//!
//! Engine operations (booking create/transition, review gate) return
//! [`DbError`] so callers receive typed domain rejections; plain row lookups
//! keep returning `sqlx::Error` directly.

use kerbside_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A typed domain rejection from the booking rules.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// An unexpected storage failure.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        classify(err)
    }
}

/// Name of the exclusion constraint backstopping the overlap check.
const EXCL_ACTIVE_OVERLAP: &str = "excl_bookings_active_overlap";

/// Name of the one-review-per-renter-per-booking unique constraint.
const UQ_REVIEW_PER_RENTER: &str = "uq_reviews_booking_user";

/// Map constraint violations the schema uses as backstops onto their domain
/// meaning. Everything else stays an opaque database error.
///
/// - SQLSTATE 23P01 (exclusion violation) on the active-booking overlap
///   constraint means a concurrent insert won the race.
/// - SQLSTATE 23505 (unique violation) on `uq_`-prefixed constraints maps to
///   a conflict; the review constraint gets its dedicated error kind.
fn classify(err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint();
        match db_err.code().as_deref() {
            Some("23P01") if constraint == Some(EXCL_ACTIVE_OVERLAP) => {
                return DbError::Domain(CoreError::OverlappingBooking(
                    "requested interval intersects a concurrently accepted booking".to_string(),
                ));
            }
            Some("23505") => match constraint {
                Some(UQ_REVIEW_PER_RENTER) => {
                    return DbError::Domain(CoreError::DuplicateReview(
                        "a review for this booking already exists".to_string(),
                    ));
                }
                Some(name) if name.starts_with("uq_") => {
                    return DbError::Domain(CoreError::Conflict(format!(
                        "duplicate value violates unique constraint: {name}"
                    )));
                }
                _ => {}
            },
            _ => {}
        }
    }
    DbError::Database(err)
}
