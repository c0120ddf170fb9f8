//! Booking lifecycle rules: state machine, capability checks, date-range
//! validation, and the interval-overlap predicate.
//!
//! This module lives in `core` (zero internal deps) so it can be used by both
//! the repository layer and any future worker or CLI tooling.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::roles::is_staff;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Booking status IDs matching `booking_statuses` seed data (1-based
/// SMALLSERIAL).
///
/// The IDs are intentionally duplicated from the `db` crate's
/// `BookingStatus` enum because `core` must have zero internal deps. The
/// `db` crate's tests assert the two stay in sync.
pub const STATUS_PENDING: i16 = 1;
pub const STATUS_CONFIRMED: i16 = 2;
pub const STATUS_ACTIVE: i16 = 3;
pub const STATUS_COMPLETED: i16 = 4;
pub const STATUS_CANCELLED: i16 = 5;

/// Statuses that hold a vehicle: a booking in any of these blocks
/// overlapping intervals and keeps the vehicle projected as RENTED.
pub const HOLDING_STATUSES: [i16; 3] = [STATUS_PENDING, STATUS_CONFIRMED, STATUS_ACTIVE];

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

pub mod state_machine {
    use super::*;

    /// Returns the set of valid target status IDs reachable from `from_status`.
    ///
    /// Terminal states (Completed=4, Cancelled=5) return an empty slice
    /// because no further transitions are allowed.
    pub fn valid_transitions(from_status: i16) -> &'static [i16] {
        match from_status {
            // Pending -> Confirmed, Cancelled
            STATUS_PENDING => &[STATUS_CONFIRMED, STATUS_CANCELLED],
            // Confirmed -> Active, Cancelled
            STATUS_CONFIRMED => &[STATUS_ACTIVE, STATUS_CANCELLED],
            // Active -> Completed. An in-progress rental cannot be cancelled;
            // it ends by being completed.
            STATUS_ACTIVE => &[STATUS_COMPLETED],
            // Terminal states
            STATUS_COMPLETED | STATUS_CANCELLED => &[],
            // Unknown status: no transitions allowed
            _ => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: i16, to: i16) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a state transition, rejecting invalid ones with a typed error.
    pub fn validate_transition(from: i16, to: i16) -> Result<(), CoreError> {
        if can_transition(from, to) {
            Ok(())
        } else {
            let from_name = status_name(from);
            let to_name = status_name(to);
            Err(CoreError::InvalidTransition(format!(
                "{from_name} ({from}) -> {to_name} ({to})"
            )))
        }
    }

    /// Whether a booking in `status` can still advance.
    pub fn is_terminal(status: i16) -> bool {
        valid_transitions(status).is_empty()
    }

    /// Human-readable name for a status ID (for error messages).
    pub fn status_name(id: i16) -> &'static str {
        match id {
            STATUS_PENDING => "PENDING",
            STATUS_CONFIRMED => "CONFIRMED",
            STATUS_ACTIVE => "ACTIVE",
            STATUS_COMPLETED => "COMPLETED",
            STATUS_CANCELLED => "CANCELLED",
            _ => "UNKNOWN",
        }
    }

    /// Capability check: may `actor_role` drive a booking to `to`?
    ///
    /// Confirm/activate/complete are staff actions. Cancellation is open to
    /// the renter as well (`is_renter` is resolved by the caller, which knows
    /// who owns the booking). The table is examined here, in the engine,
    /// rather than by route guards, so the rules hold for every caller.
    pub fn authorize_transition(
        to: i16,
        actor_role: &str,
        is_renter: bool,
    ) -> Result<(), CoreError> {
        match to {
            STATUS_CANCELLED => {
                if is_renter || is_staff(actor_role) {
                    Ok(())
                } else {
                    Err(CoreError::Forbidden(
                        "Only the renter or staff may cancel a booking".into(),
                    ))
                }
            }
            STATUS_CONFIRMED | STATUS_ACTIVE | STATUS_COMPLETED => {
                if is_staff(actor_role) {
                    Ok(())
                } else {
                    Err(CoreError::Forbidden(format!(
                        "Agent or admin role required to move a booking to {}",
                        status_name(to)
                    )))
                }
            }
            other => Err(CoreError::InvalidTransition(format!(
                "{} ({other}) is not a reachable target status",
                status_name(other)
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Interval overlap
// ---------------------------------------------------------------------------

/// Half-open interval intersection test.
///
/// `[s1, e1)` and `[s2, e2)` overlap iff `s1 < e2 && s2 < e1`. Touching
/// endpoints (one booking ends the day another starts) are adjacent, not
/// overlapping.
pub fn intervals_overlap(s1: NaiveDate, e1: NaiveDate, s2: NaiveDate, e2: NaiveDate) -> bool {
    s1 < e2 && s2 < e1
}

// ---------------------------------------------------------------------------
// Date-range validation
// ---------------------------------------------------------------------------

/// Engine-level booking policy knobs.
#[derive(Debug, Clone, Default)]
pub struct BookingPolicy {
    /// Maximum rental span in days. `None` leaves the cap to clients.
    pub max_rental_days: Option<i64>,
}

/// Validate a requested rental interval against `today` and the policy.
pub fn validate_date_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    policy: &BookingPolicy,
) -> Result<(), CoreError> {
    if start < today {
        return Err(CoreError::InvalidDateRange(format!(
            "start date {start} is in the past"
        )));
    }

    if start >= end {
        return Err(CoreError::InvalidDateRange(format!(
            "start date {start} must be before end date {end}"
        )));
    }

    if let Some(max_days) = policy.max_rental_days {
        let span = (end - start).num_days();
        if span > max_days {
            return Err(CoreError::InvalidDateRange(format!(
                "rental span of {span} days exceeds the maximum of {max_days}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::state_machine::*;
    use super::*;
    use crate::roles::{ROLE_ADMIN, ROLE_AGENT, ROLE_CUSTOMER};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // -----------------------------------------------------------------------
    // Valid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn pending_to_confirmed() {
        assert!(can_transition(STATUS_PENDING, STATUS_CONFIRMED));
    }

    #[test]
    fn pending_to_cancelled() {
        assert!(can_transition(STATUS_PENDING, STATUS_CANCELLED));
    }

    #[test]
    fn confirmed_to_active() {
        assert!(can_transition(STATUS_CONFIRMED, STATUS_ACTIVE));
    }

    #[test]
    fn confirmed_to_cancelled() {
        assert!(can_transition(STATUS_CONFIRMED, STATUS_CANCELLED));
    }

    #[test]
    fn active_to_completed() {
        assert!(can_transition(STATUS_ACTIVE, STATUS_COMPLETED));
    }

    // -----------------------------------------------------------------------
    // Invalid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn pending_cannot_skip_to_active() {
        assert!(!can_transition(STATUS_PENDING, STATUS_ACTIVE));
    }

    #[test]
    fn pending_cannot_skip_to_completed() {
        assert!(!can_transition(STATUS_PENDING, STATUS_COMPLETED));
    }

    #[test]
    fn active_cannot_be_cancelled() {
        assert!(!can_transition(STATUS_ACTIVE, STATUS_CANCELLED));
    }

    #[test]
    fn no_backward_transitions() {
        assert!(!can_transition(STATUS_CONFIRMED, STATUS_PENDING));
        assert!(!can_transition(STATUS_ACTIVE, STATUS_CONFIRMED));
        assert!(!can_transition(STATUS_COMPLETED, STATUS_ACTIVE));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        assert!(valid_transitions(STATUS_COMPLETED).is_empty());
        assert!(valid_transitions(STATUS_CANCELLED).is_empty());
        assert!(is_terminal(STATUS_COMPLETED));
        assert!(is_terminal(STATUS_CANCELLED));
    }

    #[test]
    fn repeated_cancel_is_invalid() {
        let result = validate_transition(STATUS_CANCELLED, STATUS_CANCELLED);
        assert!(matches!(result, Err(CoreError::InvalidTransition(_))));
    }

    #[test]
    fn unknown_status_has_no_exits() {
        assert!(valid_transitions(0).is_empty());
        assert!(valid_transitions(99).is_empty());
    }

    #[test]
    fn validate_transition_names_both_states() {
        let err = validate_transition(STATUS_PENDING, STATUS_COMPLETED).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("PENDING"));
        assert!(msg.contains("COMPLETED"));
    }

    // -----------------------------------------------------------------------
    // Capability table
    // -----------------------------------------------------------------------

    #[test]
    fn staff_may_confirm_activate_complete() {
        for to in [STATUS_CONFIRMED, STATUS_ACTIVE, STATUS_COMPLETED] {
            assert!(authorize_transition(to, ROLE_AGENT, false).is_ok());
            assert!(authorize_transition(to, ROLE_ADMIN, false).is_ok());
        }
    }

    #[test]
    fn customer_may_not_confirm_even_own_booking() {
        let result = authorize_transition(STATUS_CONFIRMED, ROLE_CUSTOMER, true);
        assert!(matches!(result, Err(CoreError::Forbidden(_))));
    }

    #[test]
    fn renter_may_cancel() {
        assert!(authorize_transition(STATUS_CANCELLED, ROLE_CUSTOMER, true).is_ok());
    }

    #[test]
    fn staff_may_cancel_someone_elses_booking() {
        assert!(authorize_transition(STATUS_CANCELLED, ROLE_AGENT, false).is_ok());
        assert!(authorize_transition(STATUS_CANCELLED, ROLE_ADMIN, false).is_ok());
    }

    #[test]
    fn stranger_may_not_cancel() {
        let result = authorize_transition(STATUS_CANCELLED, ROLE_CUSTOMER, false);
        assert!(matches!(result, Err(CoreError::Forbidden(_))));
    }

    #[test]
    fn pending_is_not_a_transition_target() {
        let result = authorize_transition(STATUS_PENDING, ROLE_ADMIN, false);
        assert!(matches!(result, Err(CoreError::InvalidTransition(_))));
    }

    // -----------------------------------------------------------------------
    // Overlap predicate
    // -----------------------------------------------------------------------

    #[test]
    fn touching_endpoints_do_not_overlap() {
        // [Jan 10, Jan 12) then [Jan 12, Jan 14): adjacent, not overlapping.
        assert!(!intervals_overlap(
            date(2025, 1, 10),
            date(2025, 1, 12),
            date(2025, 1, 12),
            date(2025, 1, 14),
        ));
        // And in the other order.
        assert!(!intervals_overlap(
            date(2025, 1, 12),
            date(2025, 1, 14),
            date(2025, 1, 10),
            date(2025, 1, 12),
        ));
    }

    #[test]
    fn partial_overlap_detected() {
        // [Jan 11, Jan 13) against [Jan 10, Jan 12) shares Jan 11.
        assert!(intervals_overlap(
            date(2025, 1, 11),
            date(2025, 1, 13),
            date(2025, 1, 10),
            date(2025, 1, 12),
        ));
    }

    #[test]
    fn containment_is_overlap() {
        assert!(intervals_overlap(
            date(2025, 1, 1),
            date(2025, 1, 31),
            date(2025, 1, 10),
            date(2025, 1, 12),
        ));
        assert!(intervals_overlap(
            date(2025, 1, 10),
            date(2025, 1, 12),
            date(2025, 1, 1),
            date(2025, 1, 31),
        ));
    }

    #[test]
    fn identical_intervals_overlap() {
        assert!(intervals_overlap(
            date(2025, 1, 10),
            date(2025, 1, 12),
            date(2025, 1, 10),
            date(2025, 1, 12),
        ));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!intervals_overlap(
            date(2025, 1, 1),
            date(2025, 1, 5),
            date(2025, 2, 1),
            date(2025, 2, 5),
        ));
    }

    // -----------------------------------------------------------------------
    // Date-range validation
    // -----------------------------------------------------------------------

    #[test]
    fn valid_future_range_accepted() {
        let today = date(2025, 1, 1);
        let policy = BookingPolicy::default();
        assert!(validate_date_range(date(2025, 1, 10), date(2025, 1, 12), today, &policy).is_ok());
    }

    #[test]
    fn start_today_accepted() {
        let today = date(2025, 1, 1);
        let policy = BookingPolicy::default();
        assert!(validate_date_range(today, date(2025, 1, 3), today, &policy).is_ok());
    }

    #[test]
    fn past_start_rejected() {
        let today = date(2025, 1, 10);
        let policy = BookingPolicy::default();
        let result = validate_date_range(date(2025, 1, 9), date(2025, 1, 12), today, &policy);
        assert!(matches!(result, Err(CoreError::InvalidDateRange(_))));
    }

    #[test]
    fn inverted_range_rejected() {
        let today = date(2025, 1, 1);
        let policy = BookingPolicy::default();
        let result = validate_date_range(date(2025, 1, 12), date(2025, 1, 10), today, &policy);
        assert!(matches!(result, Err(CoreError::InvalidDateRange(_))));
    }

    #[test]
    fn zero_length_range_rejected() {
        let today = date(2025, 1, 1);
        let policy = BookingPolicy::default();
        let result = validate_date_range(date(2025, 1, 10), date(2025, 1, 10), today, &policy);
        assert!(matches!(result, Err(CoreError::InvalidDateRange(_))));
    }

    #[test]
    fn policy_cap_enforced_when_set() {
        let today = date(2025, 1, 1);
        let policy = BookingPolicy {
            max_rental_days: Some(30),
        };
        // Exactly 30 days: allowed.
        assert!(validate_date_range(date(2025, 2, 1), date(2025, 3, 3), today, &policy).is_ok());
        // 31 days: rejected.
        let result = validate_date_range(date(2025, 2, 1), date(2025, 3, 4), today, &policy);
        assert!(matches!(result, Err(CoreError::InvalidDateRange(_))));
    }

    #[test]
    fn no_cap_when_policy_unset() {
        let today = date(2025, 1, 1);
        let policy = BookingPolicy::default();
        assert!(validate_date_range(date(2025, 2, 1), date(2026, 2, 1), today, &policy).is_ok());
    }
}
