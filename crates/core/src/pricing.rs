//! Rental price calculation.
//!
//! Pure and deterministic: no I/O, no clock access. The repository layer
//! computes the total inside the booking-create transaction and persists it;
//! the stored value is immutable afterwards.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Currency precision applied once at output (two decimal places).
pub const PRICE_SCALE: u32 = 2;

/// Number of billable days for the half-open interval `[start, end)`.
///
/// Dates are whole calendar days, so the difference is already an integral
/// day count; a degenerate or inverted interval still bills a single day.
pub fn billable_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(1)
}

/// Total price for renting at `price_per_day` over `[start, end)`.
///
/// `total = billable_days * price_per_day`, with currency rounding applied
/// once at the end and no intermediate rounding.
pub fn rental_price(price_per_day: Decimal, start: NaiveDate, end: NaiveDate) -> Decimal {
    let days = Decimal::from(billable_days(start, end));
    (days * price_per_day).round_dp(PRICE_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn three_days_at_flat_rate() {
        // 2025-03-01 -> 2025-03-04 is three billable days.
        let total = rental_price(dec("1000"), date(2025, 3, 1), date(2025, 3, 4));
        assert_eq!(total, dec("3000.00"));
    }

    #[test]
    fn single_day() {
        let total = rental_price(dec("49.99"), date(2025, 3, 1), date(2025, 3, 2));
        assert_eq!(total, dec("49.99"));
    }

    #[test]
    fn fractional_rate_rounds_once_at_output() {
        // 3 * 33.333 = 99.999 -> 100.00 at 2 dp, applied once at the end.
        let total = rental_price(dec("33.333"), date(2025, 3, 1), date(2025, 3, 4));
        assert_eq!(total, dec("100.00"));

        // 3 * 49.99 = 149.97 needs no rounding and must be exact.
        let total = rental_price(dec("49.99"), date(2025, 3, 1), date(2025, 3, 4));
        assert_eq!(total, dec("149.97"));
    }

    #[test]
    fn degenerate_interval_bills_minimum_one_day() {
        assert_eq!(billable_days(date(2025, 3, 1), date(2025, 3, 1)), 1);
        let total = rental_price(dec("120"), date(2025, 3, 1), date(2025, 3, 1));
        assert_eq!(total, dec("120.00"));
    }

    #[test]
    fn price_is_monotonic_in_span() {
        let rate = dec("75.50");
        let start = date(2025, 6, 1);
        let mut previous = Decimal::ZERO;
        for span in 1..=60i64 {
            let end = start + chrono::Duration::days(span);
            let total = rental_price(rate, start, end);
            assert!(
                total >= previous,
                "price must not decrease as the span grows: {span} days -> {total}"
            );
            previous = total;
        }
    }

    #[test]
    fn price_equals_days_times_rate() {
        let rate = dec("88.25");
        let start = date(2025, 6, 1);
        let end = date(2025, 6, 15);
        let days = Decimal::from(billable_days(start, end));
        assert_eq!(rental_price(rate, start, end), (days * rate).round_dp(2));
    }
}
