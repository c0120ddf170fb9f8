use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Vehicle unavailable: {0}")]
    VehicleUnavailable(String),

    #[error("Overlapping booking: {0}")]
    OverlappingBooking(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Booking not completed: {0}")]
    BookingNotCompleted(String),

    #[error("Duplicate review: {0}")]
    DuplicateReview(String),

    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
