//! Review constants and validation functions.
//!
//! A review may be attached to a booking only once, only by its renter, and
//! only after the booking completes. Ownership and completion are checked by
//! the repository inside the create transaction; the pure bounds checks live
//! here so both layers share them.

use crate::error::CoreError;

/// Lowest accepted rating.
pub const MIN_RATING: i16 = 1;

/// Highest accepted rating.
pub const MAX_RATING: i16 = 5;

/// Maximum length for a review comment.
pub const MAX_COMMENT_LENGTH: usize = 2_000;

/// Validate that a rating is an integer in `[MIN_RATING, MAX_RATING]`.
pub fn validate_rating(rating: i16) -> Result<(), CoreError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::InvalidRating(format!(
            "rating {rating} must be between {MIN_RATING} and {MAX_RATING}"
        )))
    }
}

/// Validate an optional review comment's length.
pub fn validate_comment(comment: Option<&str>) -> Result<(), CoreError> {
    if let Some(text) = comment {
        if text.len() > MAX_COMMENT_LENGTH {
            return Err(CoreError::Validation(format!(
                "comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
            )));
        }
    }
    Ok(())
}
