//! Integration tests for the overlap-safe booking create path.
//!
//! Exercises the engine against a real database:
//! - price computation and vehicle projection on create
//! - half-open interval boundaries (adjacent vs overlapping)
//! - eligibility guards (delisted, suspended, missing vehicle)
//! - two genuinely concurrent creates racing for the same interval

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use kerbside_core::booking::BookingPolicy;
use kerbside_core::error::CoreError;
use kerbside_db::error::DbError;
use kerbside_db::models::booking::CreateBooking;
use kerbside_db::models::status::{BookingStatus, VehicleStatus};
use kerbside_db::models::vehicle::CreateVehicle;
use kerbside_db::repositories::{BookingRepo, VehicleRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, email: &str, role_id: i16) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO users (email, password_hash, role_id) VALUES ($1, 'x', $2) RETURNING id",
    )
    .bind(email)
    .bind(role_id)
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

async fn seed_vehicle(pool: &PgPool, owner_id: i64, plate: &str, vin: &str, rate: &str) -> i64 {
    let input = CreateVehicle {
        license_plate: plate.to_string(),
        vin: vin.to_string(),
        make: "Toyota".to_string(),
        model: "Corolla".to_string(),
        year: 2022,
        price_per_day: rate.parse().unwrap(),
    };
    VehicleRepo::create(pool, owner_id, &input).await.unwrap().id
}

fn day(offset: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(offset)
}

fn request(vehicle_id: i64, start: NaiveDate, end: NaiveDate) -> CreateBooking {
    CreateBooking {
        vehicle_id,
        start_date: start,
        end_date: end,
        customer_id: None,
        pickup_location: None,
        return_location: None,
        notes: None,
    }
}

async fn vehicle_status(pool: &PgPool, vehicle_id: i64) -> i16 {
    VehicleRepo::find_by_id(pool, vehicle_id)
        .await
        .unwrap()
        .unwrap()
        .status_id
}

// ---------------------------------------------------------------------------
// Create: price and projection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_computes_price_and_rents_vehicle(pool: PgPool) {
    let agent = seed_user(&pool, "agent@example.com", 2).await;
    let renter = seed_user(&pool, "renter@example.com", 3).await;
    let vehicle = seed_vehicle(&pool, agent, "AB-123-CD", "1HGBH41JXMN109186", "1000").await;

    let booking = BookingRepo::create(
        &pool,
        renter,
        &request(vehicle, day(10), day(13)),
        &BookingPolicy::default(),
    )
    .await
    .unwrap();

    // Three billable days at 1000/day.
    assert_eq!(booking.total_price, Decimal::new(300000, 2));
    assert_eq!(booking.status_id, BookingStatus::Pending.id());
    assert_eq!(booking.user_id, renter);

    // The vehicle projection flips to RENTED in the same transaction.
    assert_eq!(vehicle_status(&pool, vehicle).await, VehicleStatus::Rented.id());
    assert!(!VehicleRepo::is_bookable(&pool, vehicle).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_missing_vehicle_rejected(pool: PgPool) {
    let renter = seed_user(&pool, "renter@example.com", 3).await;

    let result = BookingRepo::create(
        &pool,
        renter,
        &request(9999, day(10), day(12)),
        &BookingPolicy::default(),
    )
    .await;

    assert_matches!(
        result,
        Err(DbError::Domain(CoreError::NotFound { entity: "Vehicle", .. }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_on_suspended_vehicle_rejected(pool: PgPool) {
    let agent = seed_user(&pool, "agent@example.com", 2).await;
    let renter = seed_user(&pool, "renter@example.com", 3).await;
    let vehicle = seed_vehicle(&pool, agent, "AB-123-CD", "1HGBH41JXMN109186", "500").await;

    VehicleRepo::suspend(&pool, vehicle, VehicleStatus::Maintenance)
        .await
        .unwrap();

    let result = BookingRepo::create(
        &pool,
        renter,
        &request(vehicle, day(10), day(12)),
        &BookingPolicy::default(),
    )
    .await;

    assert_matches!(result, Err(DbError::Domain(CoreError::VehicleUnavailable(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_on_delisted_vehicle_rejected(pool: PgPool) {
    let agent = seed_user(&pool, "agent@example.com", 2).await;
    let renter = seed_user(&pool, "renter@example.com", 3).await;
    let vehicle = seed_vehicle(&pool, agent, "AB-123-CD", "1HGBH41JXMN109186", "500").await;

    VehicleRepo::delete(&pool, vehicle).await.unwrap();

    let result = BookingRepo::create(
        &pool,
        renter,
        &request(vehicle, day(10), day(12)),
        &BookingPolicy::default(),
    )
    .await;

    assert_matches!(result, Err(DbError::Domain(CoreError::VehicleUnavailable(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_past_start(pool: PgPool) {
    let agent = seed_user(&pool, "agent@example.com", 2).await;
    let renter = seed_user(&pool, "renter@example.com", 3).await;
    let vehicle = seed_vehicle(&pool, agent, "AB-123-CD", "1HGBH41JXMN109186", "500").await;

    let result = BookingRepo::create(
        &pool,
        renter,
        &request(vehicle, day(-1), day(2)),
        &BookingPolicy::default(),
    )
    .await;

    assert_matches!(result, Err(DbError::Domain(CoreError::InvalidDateRange(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_respects_policy_cap(pool: PgPool) {
    let agent = seed_user(&pool, "agent@example.com", 2).await;
    let renter = seed_user(&pool, "renter@example.com", 3).await;
    let vehicle = seed_vehicle(&pool, agent, "AB-123-CD", "1HGBH41JXMN109186", "500").await;

    let policy = BookingPolicy {
        max_rental_days: Some(30),
    };

    let result = BookingRepo::create(&pool, renter, &request(vehicle, day(1), day(40)), &policy).await;
    assert_matches!(result, Err(DbError::Domain(CoreError::InvalidDateRange(_))));

    // The same interval is fine without the cap.
    BookingRepo::create(
        &pool,
        renter,
        &request(vehicle, day(1), day(40)),
        &BookingPolicy::default(),
    )
    .await
    .unwrap();
}

// ---------------------------------------------------------------------------
// Overlap boundaries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_adjacent_intervals_accepted(pool: PgPool) {
    let agent = seed_user(&pool, "agent@example.com", 2).await;
    let renter = seed_user(&pool, "renter@example.com", 3).await;
    let vehicle = seed_vehicle(&pool, agent, "AB-123-CD", "1HGBH41JXMN109186", "500").await;

    // [day 10, day 12) then [day 12, day 14): touching endpoints are
    // adjacent, not overlapping.
    BookingRepo::create(
        &pool,
        renter,
        &request(vehicle, day(10), day(12)),
        &BookingPolicy::default(),
    )
    .await
    .unwrap();

    BookingRepo::create(
        &pool,
        renter,
        &request(vehicle, day(12), day(14)),
        &BookingPolicy::default(),
    )
    .await
    .expect("adjacent interval must be accepted");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_overlapping_interval_rejected(pool: PgPool) {
    let agent = seed_user(&pool, "agent@example.com", 2).await;
    let renter = seed_user(&pool, "renter@example.com", 3).await;
    let other = seed_user(&pool, "other@example.com", 3).await;
    let vehicle = seed_vehicle(&pool, agent, "AB-123-CD", "1HGBH41JXMN109186", "500").await;

    BookingRepo::create(
        &pool,
        renter,
        &request(vehicle, day(10), day(12)),
        &BookingPolicy::default(),
    )
    .await
    .unwrap();

    // [day 11, day 13) shares day 11 with the existing booking.
    let result = BookingRepo::create(
        &pool,
        other,
        &request(vehicle, day(11), day(13)),
        &BookingPolicy::default(),
    )
    .await;

    assert_matches!(result, Err(DbError::Domain(CoreError::OverlappingBooking(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancelled_booking_does_not_block(pool: PgPool) {
    let agent = seed_user(&pool, "agent@example.com", 2).await;
    let renter = seed_user(&pool, "renter@example.com", 3).await;
    let vehicle = seed_vehicle(&pool, agent, "AB-123-CD", "1HGBH41JXMN109186", "500").await;

    let booking = BookingRepo::create(
        &pool,
        renter,
        &request(vehicle, day(10), day(12)),
        &BookingPolicy::default(),
    )
    .await
    .unwrap();

    BookingRepo::cancel(&pool, renter, "customer", booking.id)
        .await
        .unwrap();

    // The cancelled booking released its hold on the interval.
    BookingRepo::create(
        &pool,
        renter,
        &request(vehicle, day(10), day(12)),
        &BookingPolicy::default(),
    )
    .await
    .expect("interval freed by cancellation must be bookable again");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_disjoint_booking_accepted_while_rented(pool: PgPool) {
    let agent = seed_user(&pool, "agent@example.com", 2).await;
    let renter = seed_user(&pool, "renter@example.com", 3).await;
    let vehicle = seed_vehicle(&pool, agent, "AB-123-CD", "1HGBH41JXMN109186", "500").await;

    BookingRepo::create(
        &pool,
        renter,
        &request(vehicle, day(10), day(12)),
        &BookingPolicy::default(),
    )
    .await
    .unwrap();
    assert_eq!(vehicle_status(&pool, vehicle).await, VehicleStatus::Rented.id());

    // A disjoint window later in the calendar is still bookable even though
    // the cached status is RENTED.
    BookingRepo::create(
        &pool,
        renter,
        &request(vehicle, day(20), day(22)),
        &BookingPolicy::default(),
    )
    .await
    .expect("disjoint interval must be accepted");

    assert_eq!(BookingRepo::count_holding(&pool, vehicle).await.unwrap(), 2);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

/// Two concurrent creates race for overlapping intervals on one vehicle:
/// exactly one must win, and the loser must get a typed overlap rejection.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_creates_one_winner(pool: PgPool) {
    let agent = seed_user(&pool, "agent@example.com", 2).await;
    let alice = seed_user(&pool, "alice@example.com", 3).await;
    let bob = seed_user(&pool, "bob@example.com", 3).await;
    let vehicle = seed_vehicle(&pool, agent, "AB-123-CD", "1HGBH41JXMN109186", "500").await;

    let policy = BookingPolicy::default();
    let alice_req = request(vehicle, day(10), day(14));
    let bob_req = request(vehicle, day(12), day(16));
    let (a, b) = tokio::join!(
        BookingRepo::create(&pool, alice, &alice_req, &policy),
        BookingRepo::create(&pool, bob, &bob_req, &policy),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one concurrent create must win");

    let loser = if a.is_ok() { b } else { a };
    assert_matches!(loser, Err(DbError::Domain(CoreError::OverlappingBooking(_))));

    // Only one holding booking landed.
    assert_eq!(BookingRepo::count_holding(&pool, vehicle).await.unwrap(), 1);
}
