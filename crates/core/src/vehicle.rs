//! Vehicle status constants and listing validation functions.

use rust_decimal::Decimal;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Vehicle status IDs matching `vehicle_statuses` seed data (1-based
/// SMALLSERIAL). Duplicated from the `db` crate's `VehicleStatus` enum
/// because `core` must have zero internal deps; the `db` tests assert the
/// two stay in sync.
pub const STATUS_AVAILABLE: i16 = 1;
pub const STATUS_RENTED: i16 = 2;
pub const STATUS_MAINTENANCE: i16 = 3;
pub const STATUS_OUT_OF_SERVICE: i16 = 4;

/// Manual suspension by the owner wins over the booking-derived projection
/// and excludes the vehicle from booking eligibility.
pub fn is_manually_suspended(status: i16) -> bool {
    status == STATUS_MAINTENANCE || status == STATUS_OUT_OF_SERVICE
}

/// Human-readable name for a vehicle status ID (for error messages).
pub fn status_name(id: i16) -> &'static str {
    match id {
        STATUS_AVAILABLE => "AVAILABLE",
        STATUS_RENTED => "RENTED",
        STATUS_MAINTENANCE => "MAINTENANCE",
        STATUS_OUT_OF_SERVICE => "OUT_OF_SERVICE",
        _ => "UNKNOWN",
    }
}

// ---------------------------------------------------------------------------
// Listing validation
// ---------------------------------------------------------------------------

/// VIN length mandated by ISO 3779.
pub const VIN_LENGTH: usize = 17;

/// Validate a daily rate: strictly positive.
pub fn validate_price_per_day(price: Decimal) -> Result<(), CoreError> {
    if price > Decimal::ZERO {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "price_per_day must be positive, got {price}"
        )))
    }
}

/// Validate a VIN: 17 characters, alphanumeric, excluding I, O, and Q.
pub fn validate_vin(vin: &str) -> Result<(), CoreError> {
    if vin.len() != VIN_LENGTH {
        return Err(CoreError::Validation(format!(
            "VIN '{vin}' must be exactly {VIN_LENGTH} characters"
        )));
    }

    let valid = vin
        .chars()
        .all(|c| c.is_ascii_alphanumeric() && !matches!(c.to_ascii_uppercase(), 'I' | 'O' | 'Q'));
    if !valid {
        return Err(CoreError::Validation(format!(
            "VIN '{vin}' may only contain letters (except I, O, Q) and digits"
        )));
    }

    Ok(())
}

/// Validate a license plate: non-empty after trimming, letters/digits with
/// internal spaces or dashes.
pub fn validate_license_plate(plate: &str) -> Result<(), CoreError> {
    let trimmed = plate.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "license plate must not be empty".to_string(),
        ));
    }

    let valid = trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-');
    if !valid {
        return Err(CoreError::Validation(format!(
            "license plate '{plate}' may only contain letters, digits, spaces, and dashes"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_suspended_statuses() {
        assert!(is_manually_suspended(STATUS_MAINTENANCE));
        assert!(is_manually_suspended(STATUS_OUT_OF_SERVICE));
        assert!(!is_manually_suspended(STATUS_AVAILABLE));
        assert!(!is_manually_suspended(STATUS_RENTED));
    }

    #[test]
    fn test_positive_price_accepted() {
        assert!(validate_price_per_day(dec("0.01")).is_ok());
        assert!(validate_price_per_day(dec("1250.50")).is_ok());
    }

    #[test]
    fn test_non_positive_price_rejected() {
        assert!(validate_price_per_day(Decimal::ZERO).is_err());
        assert!(validate_price_per_day(dec("-10")).is_err());
    }

    #[test]
    fn test_valid_vin_accepted() {
        assert!(validate_vin("1HGBH41JXMN109186").is_ok());
        assert!(validate_vin("wvwzzz1jz3w386752").is_ok()); // case-insensitive
    }

    #[test]
    fn test_invalid_vin_rejected() {
        assert!(validate_vin("SHORT").is_err()); // wrong length
        assert!(validate_vin("1HGBH41JXMN10918").is_err()); // 16 chars
        assert!(validate_vin("IHGBH41JXMN109186").is_err()); // contains I
        assert!(validate_vin("1HGBH41JXMN10918O").is_err()); // contains O
        assert!(validate_vin("1HGBH41JXMN10918-").is_err()); // punctuation
    }

    #[test]
    fn test_valid_plates_accepted() {
        assert!(validate_license_plate("AB-123-CD").is_ok());
        assert!(validate_license_plate("KA 05 HJ 1234").is_ok());
        assert!(validate_license_plate("7XYZ123").is_ok());
    }

    #[test]
    fn test_invalid_plates_rejected() {
        assert!(validate_license_plate("").is_err());
        assert!(validate_license_plate("   ").is_err());
        assert!(validate_license_plate("AB#123").is_err());
    }
}
