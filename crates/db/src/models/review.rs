//! Review entity model and DTOs.

use kerbside_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub booking_id: DbId,
    /// The renter who wrote the review.
    pub user_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for `POST /bookings/{id}/review`.
#[derive(Debug, Deserialize)]
pub struct CreateReview {
    pub rating: i16,
    pub comment: Option<String>,
}
